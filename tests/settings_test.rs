mod common;

use axum::http::StatusCode;
use sea_orm::TransactionTrait;
use serde_json::json;
use uuid::Uuid;

use league_api::entities::team;
use league_api::services::standings::{self, PointScheme};

fn counters(teams: &[team::Model]) -> Vec<(String, i32, i32, i32, i32)> {
    teams
        .iter()
        .map(|t| (t.id.to_string(), t.wins, t.draws, t.losses, t.points))
        .collect()
}

#[tokio::test]
async fn owner_reads_default_settings() {
    let app = common::test_app().await;
    let (token, _) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Settings League").await;

    let (status, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}/settings"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["league_id"], league_id.as_str());
    assert_eq!(json["points_for_win"], 3);
    assert_eq!(json["yellow_cards_for_suspension"], 3);
    assert_eq!(json["suspend_on_red_card"], true);
}

#[tokio::test]
async fn settings_hidden_from_non_owners() {
    let app = common::test_app().await;
    let (owner, _) = common::register(&app, "Owner", "owner@example.com").await;
    let manager = common::user_with_role(&app, "manager@example.com", "league_manager").await;
    let admin = common::user_with_role(&app, "admin@example.com", "admin").await;
    let league_id = common::create_league(&app, &owner, "Settings League").await;
    let uri = format!("/api/v1/leagues/{league_id}/settings");

    let (status, _) = common::get_with_auth(&app.router, &uri, &manager).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) =
        common::put_json_with_auth(&app.router, &uri, &manager, &json!({ "points_for_win": 2 }))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::get_with_auth(&app.router, &uri, &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_settings_rejected() {
    let app = common::test_app().await;
    let (token, _) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Settings League").await;
    let uri = format!("/api/v1/leagues/{league_id}/settings");

    for body in [
        json!({ "yellow_cards_for_suspension": 0 }),
        json!({ "points_for_draw": -1 }),
    ] {
        let (status, _) = common::put_json_with_auth(&app.router, &uri, &token, &body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    }
}

#[tokio::test]
async fn changing_the_point_scheme_recomputes_standings() {
    let app = common::test_app().await;
    let (token, _) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Settings League").await;
    let a = common::create_team(&app, &token, &league_id, "Aces").await;
    let b = common::create_team(&app, &token, &league_id, "Bees").await;
    let c = common::create_team(&app, &token, &league_id, "Cats").await;

    for (home, away, hs, aws) in [(&a, &b, 2, 0), (&b, &c, 1, 1), (&c, &a, 0, 0)] {
        let (status, body) = common::create_match(
            &app,
            &token,
            &league_id,
            home,
            away,
            json!({ "status": "completed", "home_team_score": hs, "away_team_score": aws }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
    assert_eq!(common::record_of(&app, &token, &a).await, (1, 1, 0, 4));
    assert_eq!(common::record_of(&app, &token, &b).await, (0, 1, 1, 1));
    assert_eq!(common::record_of(&app, &token, &c).await, (0, 2, 0, 2));

    let (status, body) = common::put_json_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}/settings"),
        &token,
        &json!({ "points_for_win": 2, "points_for_draw": 1, "points_for_loss": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(common::json(&body)["points_for_loss"], 1);

    assert_eq!(common::record_of(&app, &token, &a).await, (1, 1, 0, 3));
    assert_eq!(common::record_of(&app, &token, &b).await, (0, 1, 1, 2));
    assert_eq!(common::record_of(&app, &token, &c).await, (0, 2, 0, 2));

    // New results use the new scheme
    let (status, _) = common::create_match(
        &app,
        &token,
        &league_id,
        &b,
        &a,
        json!({ "status": "completed", "home_team_score": 3, "away_team_score": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(common::record_of(&app, &token, &b).await, (1, 1, 1, 4));
    assert_eq!(common::record_of(&app, &token, &a).await, (1, 1, 1, 4));
}

#[tokio::test]
async fn other_setting_changes_keep_standings() {
    let app = common::test_app().await;
    let (token, _) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Settings League").await;
    let a = common::create_team(&app, &token, &league_id, "Aces").await;
    let b = common::create_team(&app, &token, &league_id, "Bees").await;
    let (status, _) = common::create_match(
        &app,
        &token,
        &league_id,
        &a,
        &b,
        json!({ "status": "completed", "home_team_score": 1, "away_team_score": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::put_json_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}/settings"),
        &token,
        &json!({
            "require_officials": true,
            "custom_terminology": { "match": "fixture" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json = common::json(&body);
    assert_eq!(json["require_officials"], true);
    assert_eq!(json["custom_terminology"]["match"], "fixture");
    assert_eq!(common::record_of(&app, &token, &a).await, (1, 0, 0, 3));
}

#[tokio::test]
async fn recomputing_twice_matches_incremental_standings() {
    let app = common::test_app().await;
    let (token, _) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Settings League").await;
    let a = common::create_team(&app, &token, &league_id, "Aces").await;
    let b = common::create_team(&app, &token, &league_id, "Bees").await;
    let c = common::create_team(&app, &token, &league_id, "Cats").await;

    for (home, away, hs, aws) in [(&a, &b, 2, 0), (&b, &c, 1, 1), (&c, &a, 3, 1)] {
        let (status, body) = common::create_match(
            &app,
            &token,
            &league_id,
            home,
            away,
            json!({ "status": "completed", "home_team_score": hs, "away_team_score": aws }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
    let mut incremental = Vec::new();
    for id in [&a, &b, &c] {
        let (w, d, l, p) = common::record_of(&app, &token, id).await;
        incremental.push((id.to_string(), w as i32, d as i32, l as i32, p as i32));
    }
    incremental.sort();

    let league_uuid = Uuid::parse_str(&league_id).unwrap_or_default();
    let txn = app.db.begin().await;
    assert!(txn.is_ok());
    let Ok(txn) = txn else { return };

    let first = standings::recompute_league(&txn, league_uuid, PointScheme::default()).await;
    let second = standings::recompute_league(&txn, league_uuid, PointScheme::default()).await;
    assert!(first.is_ok() && second.is_ok());
    let (Ok(first), Ok(second)) = (first, second) else { return };
    let (mut first, mut second) = (counters(&first), counters(&second));
    first.sort();
    second.sort();
    assert_eq!(first, incremental);
    assert_eq!(second, incremental);
    assert!(txn.commit().await.is_ok());

    assert_eq!(common::record_of(&app, &token, &a).await, (1, 0, 1, 3));
    assert_eq!(common::record_of(&app, &token, &b).await, (0, 1, 1, 1));
    assert_eq!(common::record_of(&app, &token, &c).await, (1, 1, 0, 4));
}
