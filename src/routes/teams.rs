use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use sea_orm::sea_query::JoinType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::access::{self, TEAM_AND_MATCH_WRITER};
use crate::auth::middleware::AuthUser;
use crate::auth::{Role, password};
use crate::dto::pagination::DEFAULT_PER_PAGE;
use crate::dto::{PaginatedResponse, PaginationQuery};
use crate::entities::{game_match, league, player, team, user};
use crate::error::AppError;
use crate::routes::lookup;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::state::AppState;
use crate::utils::unique_slug;
use crate::utils::validate::{optional_text, optional_url, required_text};

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the team routes: `/teams/...` and `/leagues/{id}/teams`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(show_team).put(update_team).delete(delete_team),
        )
        .route(
            "/leagues/{id}/teams",
            get(list_league_teams).post(create_league_team),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TeamListQuery {
    pub league_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    /// Required on `/teams`; taken from the path on `/leagues/{id}/teams`
    pub league_id: Option<Uuid>,
    pub name: String,
    pub logo_path: Option<String>,
    pub description: Option<String>,
    pub home_venue: Option<String>,
    pub team_color: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub is_active: Option<bool>,
}

/// Standings counters and the owning league are not writable here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub logo_path: Option<String>,
    pub description: Option<String>,
    pub home_venue: Option<String>,
    pub team_color: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
struct TeamDetail {
    #[serde(flatten)]
    team: team::Model,
    league: league::Model,
    players: Vec<player::Model>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn validate_contact(
    contact_email: Option<&str>,
    contact_phone: Option<&str>,
    website: Option<&str>,
) -> Result<(), String> {
    if let Some(email) = contact_email {
        password::validate_email(email)?;
    }
    optional_text("contact_phone", contact_phone)?;
    optional_url("website", website)
}

/// Shared by `POST /teams` and `POST /leagues/{id}/teams`.
async fn insert_team(
    state: &AppState,
    user: &user::Model,
    league: &league::Model,
    body: CreateTeamRequest,
) -> Result<Response, AppError> {
    access::ensure_owner_or(user, league, TEAM_AND_MATCH_WRITER)?;

    let name = required_text("name", &body.name).map_err(AppError::Validation)?;
    for (field, value) in [
        ("logo_path", &body.logo_path),
        ("home_venue", &body.home_venue),
        ("team_color", &body.team_color),
    ] {
        optional_text(field, value.as_deref()).map_err(AppError::Validation)?;
    }
    validate_contact(
        body.contact_email.as_deref(),
        body.contact_phone.as_deref(),
        body.website.as_deref(),
    )
    .map_err(AppError::Validation)?;

    let slug = unique_slug::<team::Entity, _>(&state.db, team::Column::Slug, &name, "team").await?;
    let now = Utc::now().fixed_offset();

    let created = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        league_id: Set(league.id),
        name: Set(name),
        slug: Set(slug),
        logo_path: Set(body.logo_path),
        description: Set(body.description),
        home_venue: Set(body.home_venue),
        team_color: Set(body.team_color),
        contact_email: Set(body.contact_email),
        contact_phone: Set(body.contact_phone),
        website: Set(body.website),
        wins: Set(0),
        losses: Set(0),
        draws: Set(0),
        points: Set(0),
        is_active: Set(body.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Activity::new(
        user,
        Action::Created,
        EntityKind::Team,
        created.id,
        format!("Created team '{}' in league '{}'", created.name, league.name),
    )
    .after(&created)
    .record(&state.db)
    .await;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Teams of leagues visible to the caller.
async fn list_teams(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<TeamListQuery>,
) -> Result<Json<PaginatedResponse<team::Model>>, AppError> {
    let mut select = team::Entity::find();

    if let Some(league_id) = query.league_id {
        select = select.filter(team::Column::LeagueId.eq(league_id));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(team::Column::IsActive.eq(is_active));
    }
    if !user.role().satisfies(Role::Admin) {
        select = select
            .join(JoinType::InnerJoin, team::Relation::League.def())
            .filter(
                Condition::any()
                    .add(league::Column::UserId.eq(user.id))
                    .add(league::Column::IsPublic.eq(true)),
            );
    }

    let select = select
        .order_by_asc(team::Column::Name)
        .order_by_asc(team::Column::Id);
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let page = PaginatedResponse::fetch(&state.db, select, pagination, DEFAULT_PER_PAGE).await?;

    Ok(Json(page))
}

async fn create_team(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateTeamRequest>,
) -> Result<Response, AppError> {
    let league_id = body
        .league_id
        .ok_or_else(|| AppError::Validation("The league_id field is required.".to_string()))?;
    let league = lookup::league(&state.db, league_id).await?;

    insert_team(&state, &user, &league, body).await
}

async fn list_league_teams(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
) -> Result<Json<Vec<team::Model>>, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let teams = team::Entity::find()
        .filter(team::Column::LeagueId.eq(league_id))
        .order_by_asc(team::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(teams))
}

async fn create_league_team(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
    Json(body): Json<CreateTeamRequest>,
) -> Result<Response, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    insert_team(&state, &user, &league, body).await
}

async fn show_team(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamDetail>, AppError> {
    let (team, league) = lookup::team_with_league(&state.db, id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let players = player::Entity::find()
        .filter(player::Column::TeamId.eq(id))
        .order_by_asc(player::Column::LastName)
        .order_by_asc(player::Column::FirstName)
        .all(&state.db)
        .await?;

    Ok(Json(TeamDetail {
        team,
        league,
        players,
    }))
}

/// Partial update. Renaming keeps the slug.
async fn update_team(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTeamRequest>,
) -> Result<Json<team::Model>, AppError> {
    let (existing, league) = lookup::team_with_league(&state.db, id).await?;
    access::ensure_owner_or(&user, &league, TEAM_AND_MATCH_WRITER)?;

    for (field, value) in [
        ("logo_path", &body.logo_path),
        ("home_venue", &body.home_venue),
        ("team_color", &body.team_color),
    ] {
        optional_text(field, value.as_deref()).map_err(AppError::Validation)?;
    }
    validate_contact(
        body.contact_email.as_deref(),
        body.contact_phone.as_deref(),
        body.website.as_deref(),
    )
    .map_err(AppError::Validation)?;

    let mut active: team::ActiveModel = existing.clone().into();
    if let Some(name) = &body.name {
        active.name = Set(required_text("name", name).map_err(AppError::Validation)?);
    }
    if let Some(logo_path) = body.logo_path {
        active.logo_path = Set(Some(logo_path));
    }
    if let Some(description) = body.description {
        active.description = Set(Some(description));
    }
    if let Some(home_venue) = body.home_venue {
        active.home_venue = Set(Some(home_venue));
    }
    if let Some(team_color) = body.team_color {
        active.team_color = Set(Some(team_color));
    }
    if let Some(contact_email) = body.contact_email {
        active.contact_email = Set(Some(contact_email));
    }
    if let Some(contact_phone) = body.contact_phone {
        active.contact_phone = Set(Some(contact_phone));
    }
    if let Some(website) = body.website {
        active.website = Set(Some(website));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;

    Activity::new(
        &user,
        Action::Updated,
        EntityKind::Team,
        updated.id,
        format!("Updated team '{}'", updated.name),
    )
    .before(&existing)
    .after(&updated)
    .record(&state.db)
    .await;

    Ok(Json(updated))
}

/// Refused while any match references the team; deactivate it instead.
async fn delete_team(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let (existing, league) = lookup::team_with_league(&state.db, id).await?;
    access::ensure_owner_or(&user, &league, TEAM_AND_MATCH_WRITER)?;

    let txn = state.db.begin().await?;
    team::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Team"))?;
    let match_count = game_match::Entity::find()
        .filter(
            Condition::any()
                .add(game_match::Column::HomeTeamId.eq(id))
                .add(game_match::Column::AwayTeamId.eq(id)),
        )
        .count(&txn)
        .await?;
    if match_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete team with existing matches. Try setting it as inactive instead."
                .to_string(),
        ));
    }

    player::Entity::delete_many()
        .filter(player::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    team::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Activity::new(
        &user,
        Action::Deleted,
        EntityKind::Team,
        id,
        format!("Deleted team '{}' from league '{}'", existing.name, league.name),
    )
    .before(&existing)
    .record(&state.db)
    .await;

    Ok(StatusCode::NO_CONTENT)
}
