#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use league_api::config::{Config, Environment};
use league_api::entities::user;
use league_api::state::AppState;

/// App router plus a handle on its database, for assertions that look behind the API.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_expiration_secs: 3600,
        frontend_url: "http://localhost:3001".to_string(),
    }
}

/// Build the app router backed by an in-memory `SQLite` database with migrations.
pub async fn test_app() -> TestApp {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };

    TestApp {
        router: league_api::routes::router().with_state(state),
        db,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_default(),
        None => builder.body(Body::empty()).unwrap_or_default(),
    }
}

/// Test helper: send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, request("GET", uri, None, None)).await
}

pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, String) {
    send(app, request("POST", uri, None, Some(body))).await
}

pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: &Value,
) -> (StatusCode, String) {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

pub async fn post_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, request("POST", uri, Some(token), None)).await
}

pub async fn put_json_with_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: &Value,
) -> (StatusCode, String) {
    send(app, request("PUT", uri, Some(token), Some(body))).await
}

pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, request("DELETE", uri, Some(token), None)).await
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_default()
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap_or_default().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Register a user and return (`access_token`, `user_id`).
pub async fn register(app: &TestApp, name: &str, email: &str) -> (String, String) {
    let (status, body) = post_json(
        &app.router,
        "/api/v1/register",
        &json!({
            "name": name,
            "email": email,
            "password": "Password123",
            "password_confirmation": "Password123",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let body = json(&body);
    (
        body["access_token"].as_str().unwrap_or_default().to_string(),
        body["user"]["id"].as_str().unwrap_or_default().to_string(),
    )
}

/// Set a user's role directly in the database. Roles are re-read on every request.
pub async fn set_role(app: &TestApp, user_id: &str, role: &str) {
    let id: Uuid = user_id.parse().unwrap_or_default();
    let found = user::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .unwrap_or_default();
    assert!(found.is_some(), "no user {user_id}");
    if let Some(found) = found {
        let mut active: user::ActiveModel = found.into();
        active.role = Set(role.to_string());
        assert!(active.update(&app.db).await.is_ok());
    }
}

/// Register a user holding `role` and return their token.
pub async fn user_with_role(app: &TestApp, email: &str, role: &str) -> String {
    let (token, user_id) = register(app, "Test User", email).await;
    set_role(app, &user_id, role).await;
    token
}

pub async fn create_league(app: &TestApp, token: &str, name: &str) -> String {
    let (status, body) = post_json_with_auth(
        &app.router,
        "/api/v1/leagues",
        token,
        &json!({
            "name": name,
            "country": "England",
            "type": "amateur",
            "sport_type": "football",
            "season_name": "2026/27",
            "season_start_date": "2026-08-01",
            "season_end_date": "2027-05-31",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create league failed: {body}");
    id_of(&json(&body))
}

pub async fn create_team(app: &TestApp, token: &str, league_id: &str, name: &str) -> String {
    let (status, body) = post_json_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}/teams"),
        token,
        &json!({ "name": name, "home_venue": format!("{name} Park") }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create team failed: {body}");
    id_of(&json(&body))
}

/// Create a match between two teams; `extra` is merged into the request body.
pub async fn create_match(
    app: &TestApp,
    token: &str,
    league_id: &str,
    home: &str,
    away: &str,
    extra: Value,
) -> (StatusCode, Value) {
    let mut body = json!({
        "home_team_id": home,
        "away_team_id": away,
        "match_date": "2026-09-12T15:00:00Z",
    });
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    let (status, response) = post_json_with_auth(
        &app.router,
        &format!("/api/v1/leagues/{league_id}/matches"),
        token,
        &body,
    )
    .await;
    (status, json(&response))
}

/// Fetch a team and return its (wins, draws, losses, points).
pub async fn record_of(app: &TestApp, token: &str, team_id: &str) -> (i64, i64, i64, i64) {
    let (status, body) = get_with_auth(&app.router, &format!("/api/v1/teams/{team_id}"), token).await;
    assert_eq!(status, StatusCode::OK, "fetch team failed: {body}");
    let team = json(&body);
    (
        team["wins"].as_i64().unwrap_or(-1),
        team["draws"].as_i64().unwrap_or(-1),
        team["losses"].as_i64().unwrap_or(-1),
        team["points"].as_i64().unwrap_or(-1),
    )
}
