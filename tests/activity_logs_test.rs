mod common;

use axum::http::StatusCode;
use chrono::{Days, Utc};
use serde_json::json;

#[tokio::test]
async fn activity_logs_are_admin_only() {
    let app = common::test_app().await;
    let manager = common::user_with_role(&app, "manager@example.com", "league_manager").await;

    for uri in [
        "/api/v1/activity-logs",
        "/api/v1/activity-logs/actions",
        "/api/v1/activity-logs/entity-types",
    ] {
        let (status, _) = common::get_with_auth(&app.router, uri, &manager).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }

    let (status, _) = common::get(&app.router, "/api/v1/activity-logs").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutations_are_logged_with_snapshots() {
    let app = common::test_app().await;
    let (owner, owner_id) = common::register(&app, "Owner", "owner@example.com").await;
    let admin = common::user_with_role(&app, "admin@example.com", "admin").await;
    let league_id = common::create_league(&app, &owner, "Logged League").await;
    let (status, _) = common::put_json_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}"),
        &owner,
        &json!({ "name": "Renamed League" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/activity-logs?entity_type=league&entity_id={league_id}"),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = common::json(&body);
    assert_eq!(page["total"], 2);

    // Newest first
    let updated = &page["data"][0];
    assert_eq!(updated["action"], "updated");
    assert_eq!(updated["user_id"], owner_id.as_str());
    assert_eq!(updated["old_values"]["name"], "Logged League");
    assert_eq!(updated["new_values"]["name"], "Renamed League");
    let created = &page["data"][1];
    assert_eq!(created["action"], "created");
    assert!(created["old_values"].is_null());

    let (_, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/activity-logs?entity_type=league&order=asc&user_id={owner_id}"),
        &admin,
    )
    .await;
    assert_eq!(common::json(&body)["data"][0]["action"], "created");

    let log_id = common::id_of(updated);
    let (status, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/activity-logs/{log_id}"),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let detail = common::json(&body);
    assert_eq!(detail["description"], "Updated league 'Renamed League'");
    assert_eq!(detail["user"]["email"], "owner@example.com");
}

#[tokio::test]
async fn distinct_actions_and_entity_types() {
    let app = common::test_app().await;
    let admin = common::user_with_role(&app, "admin@example.com", "admin").await;
    let league_id = common::create_league(&app, &admin, "Logged League").await;
    common::create_team(&app, &admin, &league_id, "Logged Team").await;

    let (status, body) =
        common::get_with_auth(&app.router, "/api/v1/activity-logs/actions", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body), json!(["created", "registered"]));

    let (status, body) =
        common::get_with_auth(&app.router, "/api/v1/activity-logs/entity-types", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json(&body), json!(["league", "team", "user"]));
}

#[tokio::test]
async fn filter_by_date_range() {
    let app = common::test_app().await;
    let admin = common::user_with_role(&app, "admin@example.com", "admin").await;
    common::create_league(&app, &admin, "Logged League").await;

    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    let (_, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/activity-logs?date_from={today}&date_to={today}"),
        &admin,
    )
    .await;
    assert_eq!(common::json(&body)["total"], 2);

    let (_, body) = common::get_with_auth(
        &app.router,
        &format!("/api/v1/activity-logs?date_to={yesterday}"),
        &admin,
    )
    .await;
    assert_eq!(common::json(&body)["total"], 0);

    let (status, _) = common::get_with_auth(
        &app.router,
        "/api/v1/activity-logs?date_from=last-week",
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_log_is_404() {
    let app = common::test_app().await;
    let admin = common::user_with_role(&app, "admin@example.com", "admin").await;

    let (status, _) = common::get_with_auth(
        &app.router,
        "/api/v1/activity-logs/00000000-0000-0000-0000-000000000000",
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
