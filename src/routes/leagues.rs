use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::access::{self, LEAGUE_ADMIN};
use crate::auth::middleware::AuthUser;
use crate::auth::Role;
use crate::dto::{PaginatedResponse, PaginationQuery};
use crate::entities::{game_match, league, league_setting, player, team};
use crate::error::AppError;
use crate::routes::lookup;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::state::AppState;
use crate::utils::validate::{optional_text, optional_url, required_text};
use crate::utils::{Attributes, attributes, parse_date, unique_slug};

/// Default page size for league listings.
const LEAGUES_PER_PAGE: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the league routes: `/leagues/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leagues", get(list_leagues).post(create_league))
        .route(
            "/leagues/{id}",
            get(show_league).put(update_league).delete(delete_league),
        )
        .route("/leagues/{id}/standings", get(standings))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LeagueListQuery {
    pub sport_type: Option<String>,
    #[serde(rename = "type")]
    pub league_type: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeagueRequest {
    pub name: String,
    pub country: String,
    #[serde(rename = "type")]
    pub league_type: String,
    pub sport_type: String,
    pub season_name: String,
    pub season_start_date: String,
    pub season_end_date: String,
    pub website_url: Option<String>,
    pub logo_path: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub settings: Option<Attributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLeagueRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub league_type: Option<String>,
    pub sport_type: Option<String>,
    pub season_name: Option<String>,
    pub season_start_date: Option<String>,
    pub season_end_date: Option<String>,
    pub website_url: Option<String>,
    pub logo_path: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_active: Option<bool>,
    pub settings: Option<Attributes>,
}

/// A league with its settings row and teams.
#[derive(Serialize)]
struct LeagueDetail {
    #[serde(flatten)]
    league: league::Model,
    league_setting: Option<league_setting::Model>,
    teams: Vec<team::Model>,
}

/// One row of a league table.
#[derive(Serialize)]
struct StandingRow {
    id: Uuid,
    name: String,
    played: i32,
    wins: i32,
    draws: i32,
    losses: i32,
    points: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn season_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    parse_date(value).ok_or_else(|| {
        AppError::Validation(format!("The {field} field must be a date (YYYY-MM-DD)."))
    })
}

fn ensure_season_order(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::Validation(
            "The season_end_date must be after season_start_date.".to_string(),
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Leagues visible to the caller: all for admins, otherwise public ones plus the
/// caller's own.
async fn list_leagues(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<LeagueListQuery>,
) -> Result<Json<PaginatedResponse<league::Model>>, AppError> {
    let mut select = league::Entity::find();

    if let Some(sport_type) = &query.sport_type {
        select = select.filter(league::Column::SportType.eq(sport_type));
    }
    if let Some(league_type) = &query.league_type {
        select = select.filter(league::Column::LeagueType.eq(league_type));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(league::Column::IsActive.eq(is_active));
    }
    if !user.role().satisfies(Role::Admin) {
        select = select.filter(
            Condition::any()
                .add(league::Column::UserId.eq(user.id))
                .add(league::Column::IsPublic.eq(true)),
        );
    }

    let select = select
        .order_by_desc(league::Column::CreatedAt)
        .order_by_asc(league::Column::Id);
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let page = PaginatedResponse::fetch(&state.db, select, pagination, LEAGUES_PER_PAGE).await?;

    Ok(Json(page))
}

async fn create_league(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateLeagueRequest>,
) -> Result<Response, AppError> {
    let name = required_text("name", &body.name).map_err(AppError::Validation)?;
    let country = required_text("country", &body.country).map_err(AppError::Validation)?;
    let league_type = required_text("type", &body.league_type).map_err(AppError::Validation)?;
    let sport_type = required_text("sport_type", &body.sport_type).map_err(AppError::Validation)?;
    let season_name =
        required_text("season_name", &body.season_name).map_err(AppError::Validation)?;
    let season_start_date = season_date("season_start_date", &body.season_start_date)?;
    let season_end_date = season_date("season_end_date", &body.season_end_date)?;
    ensure_season_order(season_start_date, season_end_date)?;
    optional_url("website_url", body.website_url.as_deref()).map_err(AppError::Validation)?;
    optional_text("logo_path", body.logo_path.as_deref()).map_err(AppError::Validation)?;

    let now = Utc::now().fixed_offset();
    let league_id = Uuid::new_v4();

    // League and its default settings row are created together
    let txn = state.db.begin().await?;

    let slug = unique_slug::<league::Entity, _>(&txn, league::Column::Slug, &name, "league").await?;

    let created = league::ActiveModel {
        id: Set(league_id),
        user_id: Set(user.id),
        name: Set(name),
        slug: Set(slug),
        country: Set(country),
        league_type: Set(league_type),
        sport_type: Set(sport_type),
        season_name: Set(season_name),
        season_start_date: Set(season_start_date),
        season_end_date: Set(season_end_date),
        website_url: Set(body.website_url),
        logo_path: Set(body.logo_path),
        description: Set(body.description),
        is_public: Set(body.is_public.unwrap_or(true)),
        is_active: Set(true),
        settings: Set(body.settings.and_then(attributes::to_json)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    league_setting::defaults_for(league_id, now)
        .insert(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(league_id = %created.id, slug = %created.slug, "League created");

    Activity::new(
        &user,
        Action::Created,
        EntityKind::League,
        created.id,
        format!("Created league '{}'", created.name),
    )
    .after(&created)
    .record(&state.db)
    .await;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn show_league(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LeagueDetail>, AppError> {
    let league = lookup::league(&state.db, id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let league_setting = league
        .find_related(league_setting::Entity)
        .one(&state.db)
        .await?;
    let teams = league
        .find_related(team::Entity)
        .order_by_asc(team::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(LeagueDetail {
        league,
        league_setting,
        teams,
    }))
}

/// Partial update. Renaming keeps the slug.
async fn update_league(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLeagueRequest>,
) -> Result<Json<league::Model>, AppError> {
    let existing = lookup::league(&state.db, id).await?;
    access::ensure_owner_or(&user, &existing, LEAGUE_ADMIN)?;

    optional_url("website_url", body.website_url.as_deref()).map_err(AppError::Validation)?;
    optional_text("logo_path", body.logo_path.as_deref()).map_err(AppError::Validation)?;

    let start = body
        .season_start_date
        .as_deref()
        .map(|v| season_date("season_start_date", v))
        .transpose()?;
    let end = body
        .season_end_date
        .as_deref()
        .map(|v| season_date("season_end_date", v))
        .transpose()?;
    ensure_season_order(
        start.unwrap_or(existing.season_start_date),
        end.unwrap_or(existing.season_end_date),
    )?;

    let mut active: league::ActiveModel = existing.clone().into();
    if let Some(name) = &body.name {
        active.name = Set(required_text("name", name).map_err(AppError::Validation)?);
    }
    if let Some(country) = &body.country {
        active.country = Set(required_text("country", country).map_err(AppError::Validation)?);
    }
    if let Some(league_type) = &body.league_type {
        active.league_type = Set(required_text("type", league_type).map_err(AppError::Validation)?);
    }
    if let Some(sport_type) = &body.sport_type {
        active.sport_type =
            Set(required_text("sport_type", sport_type).map_err(AppError::Validation)?);
    }
    if let Some(season_name) = &body.season_name {
        active.season_name =
            Set(required_text("season_name", season_name).map_err(AppError::Validation)?);
    }
    if let Some(start) = start {
        active.season_start_date = Set(start);
    }
    if let Some(end) = end {
        active.season_end_date = Set(end);
    }
    if let Some(website_url) = body.website_url {
        active.website_url = Set(Some(website_url));
    }
    if let Some(logo_path) = body.logo_path {
        active.logo_path = Set(Some(logo_path));
    }
    if let Some(description) = body.description {
        active.description = Set(Some(description));
    }
    if let Some(is_public) = body.is_public {
        active.is_public = Set(is_public);
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(settings) = body.settings {
        active.settings = Set(attributes::to_json(settings));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;

    Activity::new(
        &user,
        Action::Updated,
        EntityKind::League,
        updated.id,
        format!("Updated league '{}'", updated.name),
    )
    .before(&existing)
    .after(&updated)
    .record(&state.db)
    .await;

    Ok(Json(updated))
}

/// Delete a league with its matches, players, teams and settings in one transaction.
async fn delete_league(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = lookup::league(&state.db, id).await?;
    access::ensure_owner_or(&user, &existing, LEAGUE_ADMIN)?;

    let txn = state.db.begin().await?;

    // Matches reference teams with a restricting key, so they go first
    game_match::Entity::delete_many()
        .filter(game_match::Column::LeagueId.eq(id))
        .exec(&txn)
        .await?;

    let team_ids: Vec<Uuid> = team::Entity::find()
        .filter(team::Column::LeagueId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    player::Entity::delete_many()
        .filter(player::Column::TeamId.is_in(team_ids))
        .exec(&txn)
        .await?;
    team::Entity::delete_many()
        .filter(team::Column::LeagueId.eq(id))
        .exec(&txn)
        .await?;
    league_setting::Entity::delete_many()
        .filter(league_setting::Column::LeagueId.eq(id))
        .exec(&txn)
        .await?;
    league::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(league_id = %id, "League deleted");

    Activity::new(
        &user,
        Action::Deleted,
        EntityKind::League,
        id,
        format!("Deleted league '{}'", existing.name),
    )
    .before(&existing)
    .record(&state.db)
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Active teams ordered by points, then wins, then name.
async fn standings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StandingRow>>, AppError> {
    let league = lookup::league(&state.db, id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let teams = team::Entity::find()
        .filter(team::Column::LeagueId.eq(id))
        .filter(team::Column::IsActive.eq(true))
        .order_by_desc(team::Column::Points)
        .order_by_desc(team::Column::Wins)
        .order_by_asc(team::Column::Name)
        .all(&state.db)
        .await?;

    let rows = teams
        .into_iter()
        .map(|t| StandingRow {
            id: t.id,
            name: t.name,
            played: t.wins + t.draws + t.losses,
            wins: t.wins,
            draws: t.draws,
            losses: t.losses,
            points: t.points,
        })
        .collect();

    Ok(Json(rows))
}
