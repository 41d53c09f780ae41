mod activity_logs;
mod auth;
mod health;
mod leagues;
mod lookup;
mod matches;
mod players;
mod settings;
mod teams;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: liveness check
/// - `/api/v1/...`: the API; everything except `/register`, `/login` and `/health`
///   requires a bearer token
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .merge(auth::router())
        .merge(leagues::router())
        .merge(settings::router())
        .merge(teams::router())
        .merge(players::router())
        .merge(matches::router())
        .merge(activity_logs::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
