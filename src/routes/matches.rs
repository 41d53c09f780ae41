use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use sea_orm::sea_query::JoinType;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select,
};
use uuid::Uuid;

use crate::auth::Role;
use crate::auth::access::{self, TEAM_AND_MATCH_WRITER};
use crate::auth::middleware::AuthUser;
use crate::dto::pagination::DEFAULT_PER_PAGE;
use crate::dto::{
    CreateMatchRequest, MatchDetail, MatchListQuery, PaginatedResponse, ScoreRequest,
    UpdateMatchRequest,
};
use crate::entities::{MatchStatus, game_match, league, user};
use crate::error::AppError;
use crate::routes::lookup;
use crate::services::MatchService;
use crate::state::AppState;
use crate::utils::parse_date;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the match routes: `/matches/...`, `/leagues/{id}/matches`, `/teams/{id}/matches`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route(
            "/matches/{id}",
            get(show_match).put(update_match).delete(delete_match),
        )
        .route("/matches/{id}/score", put(update_score))
        .route(
            "/leagues/{id}/matches",
            get(list_league_matches).post(create_league_match),
        )
        .route("/teams/{id}/matches", get(list_team_matches))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn filter_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    parse_date(value).ok_or_else(|| {
        AppError::Validation(format!("The {field} field must be a date (YYYY-MM-DD)."))
    })
}

fn start_of(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Apply the status, date range and ordering parts of a match listing query.
///
/// Date bounds are whole days in UTC: `to_date` includes the entire day.
fn apply_query(
    mut select: Select<game_match::Entity>,
    query: &MatchListQuery,
) -> Result<Select<game_match::Entity>, AppError> {
    if let Some(status) = &query.status {
        let status: MatchStatus = status.parse().map_err(AppError::Validation)?;
        select = select.filter(game_match::Column::Status.eq(status.as_str()));
    }
    if let Some(from) = &query.from_date
        && let Some(from) = start_of(filter_date("from_date", from)?)
    {
        select = select.filter(game_match::Column::MatchDate.gte(from));
    }
    if let Some(to) = &query.to_date {
        let next_day = filter_date("to_date", to)?.checked_add_days(Days::new(1));
        if let Some(until) = next_day.and_then(start_of) {
            select = select.filter(game_match::Column::MatchDate.lt(until));
        }
    }

    let select = if query.direction.as_deref() == Some("desc") {
        select.order_by_desc(game_match::Column::MatchDate)
    } else {
        select.order_by_asc(game_match::Column::MatchDate)
    };
    Ok(select.order_by_asc(game_match::Column::Id))
}

fn involving(team_id: Uuid) -> Condition {
    Condition::any()
        .add(game_match::Column::HomeTeamId.eq(team_id))
        .add(game_match::Column::AwayTeamId.eq(team_id))
}

async fn paginate(
    state: &AppState,
    select: Select<game_match::Entity>,
    query: &MatchListQuery,
) -> Result<Json<PaginatedResponse<game_match::Model>>, AppError> {
    let select = apply_query(select, query)?;
    let page =
        PaginatedResponse::fetch(&state.db, select, query.pagination(), DEFAULT_PER_PAGE).await?;
    Ok(Json(page))
}

/// The match's league, after checking the caller may write matches there.
async fn writable_league(
    state: &AppState,
    user: &user::Model,
    league_id: Uuid,
) -> Result<league::Model, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    access::ensure_owner_or(user, &league, TEAM_AND_MATCH_WRITER)?;
    Ok(league)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Matches in leagues visible to the caller.
async fn list_matches(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<PaginatedResponse<game_match::Model>>, AppError> {
    let mut select = game_match::Entity::find();

    if let Some(league_id) = query.league_id {
        select = select.filter(game_match::Column::LeagueId.eq(league_id));
    }
    if let Some(team_id) = query.team_id {
        select = select.filter(involving(team_id));
    }
    if !user.role().satisfies(Role::Admin) {
        select = select
            .join(JoinType::InnerJoin, game_match::Relation::League.def())
            .filter(
                Condition::any()
                    .add(league::Column::UserId.eq(user.id))
                    .add(league::Column::IsPublic.eq(true)),
            );
    }

    paginate(&state, select, &query).await
}

async fn create_match(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateMatchRequest>,
) -> Result<Response, AppError> {
    let league_id = body
        .league_id
        .ok_or_else(|| AppError::Validation("The league_id field is required.".to_string()))?;
    let league = writable_league(&state, &user, league_id).await?;

    let created = MatchService::create(&state.db, &user, &league, body).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn list_league_matches(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<PaginatedResponse<game_match::Model>>, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let select = game_match::Entity::find().filter(game_match::Column::LeagueId.eq(league_id));
    paginate(&state, select, &query).await
}

async fn create_league_match(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
    Json(body): Json<CreateMatchRequest>,
) -> Result<Response, AppError> {
    let league = writable_league(&state, &user, league_id).await?;

    let created = MatchService::create(&state.db, &user, &league, body).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn list_team_matches(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(team_id): Path<Uuid>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<PaginatedResponse<game_match::Model>>, AppError> {
    let (_team, league) = lookup::team_with_league(&state.db, team_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let select = game_match::Entity::find().filter(involving(team_id));
    paginate(&state, select, &query).await
}

async fn show_match(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchDetail>, AppError> {
    let game_match = lookup::game_match(&state.db, id).await?;
    let league = lookup::league(&state.db, game_match.league_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let home_team = lookup::team(&state.db, game_match.home_team_id).await?;
    let away_team = lookup::team(&state.db, game_match.away_team_id).await?;

    Ok(Json(MatchDetail {
        game_match,
        home_team,
        away_team,
    }))
}

async fn update_match(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMatchRequest>,
) -> Result<Json<game_match::Model>, AppError> {
    let existing = lookup::game_match(&state.db, id).await?;
    writable_league(&state, &user, existing.league_id).await?;

    let updated = MatchService::update(&state.db, &user, existing, body).await?;
    Ok(Json(updated))
}

/// Shortcut for completing a match with a final score.
async fn update_score(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ScoreRequest>,
) -> Result<Json<game_match::Model>, AppError> {
    let existing = lookup::game_match(&state.db, id).await?;
    writable_league(&state, &user, existing.league_id).await?;

    let updated = MatchService::record_score(
        &state.db,
        &user,
        existing,
        body.home_team_score,
        body.away_team_score,
    )
    .await?;
    Ok(Json(updated))
}

async fn delete_match(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = lookup::game_match(&state.db, id).await?;
    writable_league(&state, &user, existing.league_id).await?;

    MatchService::delete(&state.db, &user, existing).await?;
    Ok(StatusCode::NO_CONTENT)
}
