mod common;

use axum::http::StatusCode;
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

use league_api::dto::UpdateMatchRequest;
use league_api::entities::{game_match, user};
use league_api::services::MatchService;

/// A league owner's token, the league id and three of its teams.
struct Fixture {
    app: common::TestApp,
    token: String,
    user_id: String,
    league_id: String,
    home: String,
    away: String,
    third: String,
}

async fn fixture() -> Fixture {
    let app = common::test_app().await;
    let (token, user_id) = common::register(&app, "Owner", "owner@example.com").await;
    let league_id = common::create_league(&app, &token, "Match League").await;
    let home = common::create_team(&app, &token, &league_id, "Home United").await;
    let away = common::create_team(&app, &token, &league_id, "Away Rovers").await;
    let third = common::create_team(&app, &token, &league_id, "Third Town").await;
    Fixture {
        app,
        token,
        user_id,
        league_id,
        home,
        away,
        third,
    }
}

impl Fixture {
    async fn record(&self, team_id: &str) -> (i64, i64, i64, i64) {
        common::record_of(&self.app, &self.token, team_id).await
    }

    async fn create(&self, extra: serde_json::Value) -> (StatusCode, serde_json::Value) {
        common::create_match(&self.app, &self.token, &self.league_id, &self.home, &self.away, extra)
            .await
    }

    async fn owner(&self) -> Option<user::Model> {
        let id = Uuid::parse_str(&self.user_id).ok()?;
        user::Entity::find_by_id(id).one(&self.app.db).await.ok()?
    }

    /// The stored row as of now, for handing to the service later.
    async fn snapshot(&self, match_id: &str) -> Option<game_match::Model> {
        let id = Uuid::parse_str(match_id).ok()?;
        game_match::Entity::find_by_id(id).one(&self.app.db).await.ok()?
    }

    async fn update(&self, match_id: &str, body: serde_json::Value) -> (StatusCode, String) {
        common::put_json_with_auth(
            &self.app.router,
            &format!("/api/v1/matches/{match_id}"),
            &self.token,
            &body,
        )
        .await
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Standings effects
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn completed_match_counts_until_deleted() {
    let f = fixture().await;

    let (status, created) = f
        .create(json!({ "status": "completed", "home_team_score": 2, "away_team_score": 0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));
    assert_eq!(f.record(&f.away).await, (0, 0, 1, 0));

    let match_id = common::id_of(&created);
    let (status, _) = common::delete_with_auth(
        &f.app.router,
        &format!("/api/v1/matches/{match_id}"),
        &f.token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(f.record(&f.home).await, (0, 0, 0, 0));
    assert_eq!(f.record(&f.away).await, (0, 0, 0, 0));
}

#[tokio::test]
async fn scheduled_then_scored_then_cancelled() {
    let f = fixture().await;

    let (status, created) = f.create(json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "scheduled");
    assert!(created["home_team_score"].is_null());
    assert_eq!(f.record(&f.home).await, (0, 0, 0, 0));
    let match_id = common::id_of(&created);

    let (status, body) = common::put_json_with_auth(
        &f.app.router,
        &format!("/api/v1/matches/{match_id}/score"),
        &f.token,
        &json!({ "home_team_score": 1, "away_team_score": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(common::json(&body)["status"], "completed");
    assert_eq!(f.record(&f.home).await, (0, 1, 0, 1));
    assert_eq!(f.record(&f.away).await, (0, 1, 0, 1));

    let (status, body) = f.update(&match_id, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json = common::json(&body);
    assert_eq!(json["status"], "cancelled");
    assert!(json["home_team_score"].is_null());
    assert!(json["away_team_score"].is_null());
    assert_eq!(f.record(&f.home).await, (0, 0, 0, 0));
    assert_eq!(f.record(&f.away).await, (0, 0, 0, 0));
}

#[tokio::test]
async fn editing_a_completed_score_moves_the_points() {
    let f = fixture().await;

    let (_, created) = f
        .create(json!({ "status": "completed", "home_team_score": 2, "away_team_score": 1 }))
        .await;
    let match_id = common::id_of(&created);
    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));

    let (status, body) = f
        .update(&match_id, json!({ "home_team_score": 1, "away_team_score": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(f.record(&f.home).await, (0, 0, 1, 0));
    assert_eq!(f.record(&f.away).await, (1, 0, 0, 3));
}

#[tokio::test]
async fn changing_a_team_of_a_completed_match() {
    let f = fixture().await;

    let (_, created) = f
        .create(json!({ "status": "completed", "home_team_score": 0, "away_team_score": 3 }))
        .await;
    let match_id = common::id_of(&created);
    assert_eq!(f.record(&f.away).await, (1, 0, 0, 3));

    let (status, body) = f.update(&match_id, json!({ "away_team_id": f.third })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(f.record(&f.away).await, (0, 0, 0, 0));
    assert_eq!(f.record(&f.third).await, (1, 0, 0, 3));
    assert_eq!(f.record(&f.home).await, (0, 0, 1, 0));
}

#[tokio::test]
async fn non_result_edits_leave_standings_alone() {
    let f = fixture().await;

    let (_, created) = f
        .create(json!({ "status": "completed", "home_team_score": 1, "away_team_score": 0 }))
        .await;
    let match_id = common::id_of(&created);

    let (status, body) = f
        .update(&match_id, json!({ "referee": "P. Collina", "is_featured": true }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let json = common::json(&body);
    assert_eq!(json["referee"], "P. Collina");
    assert_eq!(json["home_team_score"], 1);
    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));
    assert_eq!(f.record(&f.away).await, (0, 0, 1, 0));
}

#[tokio::test]
async fn rejected_update_changes_nothing() {
    let f = fixture().await;

    let (_, created) = f
        .create(json!({ "status": "completed", "home_team_score": 1, "away_team_score": 0 }))
        .await;
    let match_id = common::id_of(&created);

    let (status, _) = f
        .update(&match_id, json!({ "home_team_score": -1 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));

    let (_, body) = common::get_with_auth(
        &f.app.router,
        &format!("/api/v1/matches/{match_id}"),
        &f.token,
    )
    .await;
    assert_eq!(common::json(&body)["home_team_score"], 1);
}

#[tokio::test]
async fn replaying_a_stale_cancel_reverts_only_once() {
    let f = fixture().await;
    let result = json!({ "status": "completed", "home_team_score": 2, "away_team_score": 0 });
    let (_, first) = f.create(result.clone()).await;
    let (status, _) = f.create(result).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(f.record(&f.home).await, (2, 0, 0, 6));

    let actor = f.owner().await;
    let stale = f.snapshot(&common::id_of(&first)).await;
    assert!(actor.is_some() && stale.is_some());
    let (Some(actor), Some(stale)) = (actor, stale) else { return };

    for _ in 0..2 {
        let cancel = UpdateMatchRequest {
            status: Some("cancelled".to_string()),
            ..Default::default()
        };
        let updated = MatchService::update(&f.app.db, &actor, stale.clone(), cancel).await;
        assert!(updated.is_ok(), "{updated:?}");
    }

    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));
    assert_eq!(f.record(&f.away).await, (0, 0, 1, 0));
}

#[tokio::test]
async fn stale_edit_keeps_the_recorded_score() {
    let f = fixture().await;
    let (_, created) = f
        .create(json!({ "status": "completed", "home_team_score": 2, "away_team_score": 1 }))
        .await;
    let match_id = common::id_of(&created);

    let actor = f.owner().await;
    let stale = f.snapshot(&match_id).await;
    assert!(actor.is_some() && stale.is_some());
    let (Some(actor), Some(stale)) = (actor, stale) else { return };

    let scored = MatchService::record_score(&f.app.db, &actor, stale.clone(), 0, 2).await;
    assert!(scored.is_ok(), "{scored:?}");

    let venue_only = UpdateMatchRequest {
        venue: Some("Neutral Ground".to_string()),
        ..Default::default()
    };
    let updated = MatchService::update(&f.app.db, &actor, stale, venue_only).await;
    assert!(updated.is_ok(), "{updated:?}");
    let Ok(updated) = updated else { return };
    assert_eq!(updated.home_team_score, Some(0));
    assert_eq!(updated.away_team_score, Some(2));
    assert_eq!(updated.venue.as_deref(), Some("Neutral Ground"));

    assert_eq!(f.record(&f.home).await, (0, 0, 1, 0));
    assert_eq!(f.record(&f.away).await, (1, 0, 0, 3));
}

#[tokio::test]
async fn deleting_an_already_deleted_match_leaves_standings_alone() {
    let f = fixture().await;
    let result = json!({ "status": "completed", "home_team_score": 3, "away_team_score": 1 });
    let (_, first) = f.create(result.clone()).await;
    let (status, _) = f.create(result).await;
    assert_eq!(status, StatusCode::CREATED);

    let actor = f.owner().await;
    let stale = f.snapshot(&common::id_of(&first)).await;
    assert!(actor.is_some() && stale.is_some());
    let (Some(actor), Some(stale)) = (actor, stale) else { return };

    let deleted = MatchService::delete(&f.app.db, &actor, stale.clone()).await;
    assert!(deleted.is_ok(), "{deleted:?}");
    let again = MatchService::delete(&f.app.db, &actor, stale).await;
    assert!(again.is_err());

    assert_eq!(f.record(&f.home).await, (1, 0, 0, 3));
    assert_eq!(f.record(&f.away).await, (0, 0, 1, 0));
}

// ──────────────────────────────────────────────────────────────────────────────
// Validation
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_match_validation() {
    let f = fixture().await;
    let uri = format!("/api/v1/leagues/{}/matches", f.league_id);

    let cases = [
        json!({ "home_team_id": f.home, "away_team_id": f.home, "match_date": "2026-09-12" }),
        json!({ "home_team_id": f.home, "away_team_id": f.away, "match_date": "someday" }),
        json!({
            "home_team_id": f.home, "away_team_id": f.away, "match_date": "2026-09-12",
            "status": "abandoned",
        }),
        json!({
            "home_team_id": f.home, "away_team_id": f.away, "match_date": "2026-09-12",
            "home_team_score": 1, "away_team_score": 0,
        }),
        json!({
            "home_team_id": f.home, "away_team_id": f.away, "match_date": "2026-09-12",
            "status": "completed", "home_team_score": 1,
        }),
    ];
    for case in cases {
        let (status, body) = common::post_json_with_auth(&f.app.router, &uri, &f.token, &case).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{case} gave {body}");
    }
    assert_eq!(f.record(&f.home).await, (0, 0, 0, 0));
}

#[tokio::test]
async fn create_match_with_unknown_team_is_404() {
    let f = fixture().await;

    let (status, body) = common::create_match(
        &f.app,
        &f.token,
        &f.league_id,
        &f.home,
        "00000000-0000-0000-0000-000000000000",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Away team not found.");
}

#[tokio::test]
async fn teams_must_belong_to_the_match_league() {
    let f = fixture().await;
    let other_league = common::create_league(&f.app, &f.token, "Other League").await;
    let outsider = common::create_team(&f.app, &f.token, &other_league, "Outsiders").await;

    let (status, _) =
        common::create_match(&f.app, &f.token, &f.league_id, &f.home, &outsider, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn only_owner_or_league_manager_may_write_matches() {
    let f = fixture().await;
    let coach = common::user_with_role(&f.app, "coach@example.com", "team_manager").await;
    let manager = common::user_with_role(&f.app, "manager@example.com", "league_manager").await;

    let (status, _) =
        common::create_match(&f.app, &coach, &f.league_id, &f.home, &f.away, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        common::create_match(&f.app, &manager, &f.league_id, &f.home, &f.away, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
}

// ──────────────────────────────────────────────────────────────────────────────
// Reads
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn show_match_includes_teams_and_default_venue() {
    let f = fixture().await;
    let (_, created) = f.create(json!({})).await;
    assert_eq!(created["venue"], "Home United Park");

    let (status, body) = common::get_with_auth(
        &f.app.router,
        &format!("/api/v1/matches/{}", common::id_of(&created)),
        &f.token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["home_team"]["name"], "Home United");
    assert_eq!(json["away_team"]["name"], "Away Rovers");
}

#[tokio::test]
async fn list_matches_filters_by_status_and_date() {
    let f = fixture().await;
    let completed = json!({ "status": "completed", "home_team_score": 1, "away_team_score": 0 });
    for (date, mut extra) in [
        ("2026-09-01T12:00:00Z", completed),
        ("2026-09-08T12:00:00Z", json!({})),
        ("2026-09-15T23:30:00Z", json!({ "status": "postponed" })),
    ] {
        extra["match_date"] = json!(date);
        let (status, body) = f.create(extra).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (_, body) = common::get_with_auth(
        &f.app.router,
        &format!("/api/v1/leagues/{}/matches?status=scheduled", f.league_id),
        &f.token,
    )
    .await;
    assert_eq!(common::json(&body)["total"], 1);

    let (_, body) = common::get_with_auth(
        &f.app.router,
        "/api/v1/matches?from_date=2026-09-08&to_date=2026-09-15",
        &f.token,
    )
    .await;
    let json = common::json(&body);
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"][0]["status"], "scheduled");

    let (_, body) =
        common::get_with_auth(&f.app.router, "/api/v1/matches?direction=desc", &f.token).await;
    assert_eq!(common::json(&body)["data"][0]["status"], "postponed");

    let (status, _) =
        common::get_with_auth(&f.app.router, "/api/v1/matches?status=bogus", &f.token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = common::get_with_auth(
        &f.app.router,
        &format!("/api/v1/teams/{}/matches", f.away),
        &f.token,
    )
    .await;
    assert_eq!(common::json(&body)["total"], 3);

    let (_, body) = common::get_with_auth(
        &f.app.router,
        &format!("/api/v1/teams/{}/matches", f.third),
        &f.token,
    )
    .await;
    assert_eq!(common::json(&body)["total"], 0);
}
