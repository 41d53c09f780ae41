mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn liveness_returns_ok_without_database_check() {
    let app = common::test_app().await;
    let (status, body) = common::get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "unchecked");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn api_health_reports_database_connected() {
    let app = common::test_app().await;
    let (status, body) = common::get(&app.router, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    let json = common::json(&body);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::test_app().await;
    let (status, _body) = common::get(&app.router, "/api/v1/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = common::test_app().await;

    for uri in ["/api/v1/leagues", "/api/v1/teams", "/api/v1/matches", "/api/v1/user"] {
        let (status, body) = common::get(&app.router, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} returned {body}");
        assert_eq!(common::json(&body)["error"]["code"], "UNAUTHORIZED");
    }
}
