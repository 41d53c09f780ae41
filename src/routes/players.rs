use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::JoinType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::access::{self, PLAYER_WRITER};
use crate::auth::middleware::AuthUser;
use crate::auth::{Role, password};
use crate::dto::pagination::DEFAULT_PER_PAGE;
use crate::dto::{PaginatedResponse, PaginationQuery};
use crate::entities::{league, player, team, user};
use crate::error::AppError;
use crate::routes::lookup;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::state::AppState;
use crate::utils::validate::{optional_text, required_text};
use crate::utils::{Attributes, attributes, parse_date};

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the player routes: `/players/...` and `/teams/{id}/players`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/{id}",
            get(show_player).put(update_player).delete(delete_player),
        )
        .route("/players/{id}/statistics", put(update_statistics))
        .route(
            "/teams/{id}/players",
            get(list_team_players).post(create_team_player),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PlayerListQuery {
    pub team_id: Option<Uuid>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    /// Required on `/players`; taken from the path on `/teams/{id}/players`
    pub team_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub jersey_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub position: Option<String>,
    pub photo_path: Option<String>,
    pub bio: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub nationality: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub statistics: Option<Attributes>,
    pub is_active: Option<bool>,
    pub is_captain: Option<bool>,
}

/// Partial update. `statistics` here replaces the whole map; use the statistics
/// endpoint to merge.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlayerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub jersey_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub position: Option<String>,
    pub photo_path: Option<String>,
    pub bio: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub nationality: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub statistics: Option<Attributes>,
    pub is_active: Option<bool>,
    pub is_captain: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsRequest {
    pub statistics: Attributes,
}

#[derive(Serialize)]
struct PlayerDetail {
    #[serde(flatten)]
    player: player::Model,
    team: team::Model,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A birth date must parse and lie in the past.
fn birth_date(value: &str) -> Result<NaiveDate, AppError> {
    let date = parse_date(value).ok_or_else(|| {
        AppError::Validation("The date_of_birth field must be a date (YYYY-MM-DD).".to_string())
    })?;
    if date >= Utc::now().date_naive() {
        return Err(AppError::Validation(
            "The date_of_birth field must be a date before today.".to_string(),
        ));
    }
    Ok(date)
}

fn validate_details(
    contact_email: Option<&str>,
    short_fields: [(&str, Option<&str>); 7],
) -> Result<(), AppError> {
    if let Some(email) = contact_email {
        password::validate_email(email).map_err(AppError::Validation)?;
    }
    for (field, value) in short_fields {
        optional_text(field, value).map_err(AppError::Validation)?;
    }
    Ok(())
}

/// The player's team and league, after checking the caller may write players there.
async fn writable_team(
    state: &AppState,
    user: &user::Model,
    team_id: Uuid,
) -> Result<(team::Model, league::Model), AppError> {
    let (team, league) = lookup::team_with_league(&state.db, team_id).await?;
    access::ensure_owner_or(user, &league, PLAYER_WRITER)?;
    Ok((team, league))
}

/// Shared by `POST /players` and `POST /teams/{id}/players`.
async fn insert_player(
    state: &AppState,
    user: &user::Model,
    team_id: Uuid,
    body: CreatePlayerRequest,
) -> Result<Response, AppError> {
    let (team, _league) = writable_team(state, user, team_id).await?;

    let first_name = required_text("first_name", &body.first_name).map_err(AppError::Validation)?;
    let last_name = required_text("last_name", &body.last_name).map_err(AppError::Validation)?;
    let date_of_birth = body.date_of_birth.as_deref().map(birth_date).transpose()?;
    validate_details(
        body.contact_email.as_deref(),
        [
            ("jersey_number", body.jersey_number.as_deref()),
            ("position", body.position.as_deref()),
            ("photo_path", body.photo_path.as_deref()),
            ("contact_phone", body.contact_phone.as_deref()),
            ("nationality", body.nationality.as_deref()),
            ("height", body.height.as_deref()),
            ("weight", body.weight.as_deref()),
        ],
    )?;

    let now = Utc::now().fixed_offset();
    let created = player::ActiveModel {
        id: Set(Uuid::new_v4()),
        team_id: Set(team.id),
        first_name: Set(first_name),
        last_name: Set(last_name),
        jersey_number: Set(body.jersey_number),
        date_of_birth: Set(date_of_birth),
        position: Set(body.position),
        photo_path: Set(body.photo_path),
        bio: Set(body.bio),
        contact_email: Set(body.contact_email),
        contact_phone: Set(body.contact_phone),
        nationality: Set(body.nationality),
        height: Set(body.height),
        weight: Set(body.weight),
        statistics: Set(body.statistics.and_then(attributes::to_json)),
        is_active: Set(body.is_active.unwrap_or(true)),
        is_captain: Set(body.is_captain.unwrap_or(false)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Activity::new(
        user,
        Action::Created,
        EntityKind::Player,
        created.id,
        format!("Added player '{}' to team '{}'", created.full_name(), team.name),
    )
    .after(&created)
    .record(&state.db)
    .await;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Players of teams in leagues visible to the caller.
async fn list_players(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PlayerListQuery>,
) -> Result<Json<PaginatedResponse<player::Model>>, AppError> {
    let mut select = player::Entity::find();

    if let Some(team_id) = query.team_id {
        select = select.filter(player::Column::TeamId.eq(team_id));
    }
    if let Some(position) = &query.position {
        select = select.filter(player::Column::Position.eq(position));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(player::Column::IsActive.eq(is_active));
    }
    if !user.role().satisfies(Role::Admin) {
        select = select
            .join(JoinType::InnerJoin, player::Relation::Team.def())
            .join(JoinType::InnerJoin, team::Relation::League.def())
            .filter(
                Condition::any()
                    .add(league::Column::UserId.eq(user.id))
                    .add(league::Column::IsPublic.eq(true)),
            );
    }

    let select = select
        .order_by_asc(player::Column::LastName)
        .order_by_asc(player::Column::FirstName)
        .order_by_asc(player::Column::Id);
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let page = PaginatedResponse::fetch(&state.db, select, pagination, DEFAULT_PER_PAGE).await?;

    Ok(Json(page))
}

async fn create_player(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<Response, AppError> {
    let team_id = body
        .team_id
        .ok_or_else(|| AppError::Validation("The team_id field is required.".to_string()))?;
    insert_player(&state, &user, team_id, body).await
}

async fn list_team_players(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<player::Model>>, AppError> {
    let (team, league) = lookup::team_with_league(&state.db, team_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    let players = team
        .find_related(player::Entity)
        .order_by_asc(player::Column::LastName)
        .order_by_asc(player::Column::FirstName)
        .all(&state.db)
        .await?;

    Ok(Json(players))
}

async fn create_team_player(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<Response, AppError> {
    insert_player(&state, &user, team_id, body).await
}

async fn show_player(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerDetail>, AppError> {
    let player = lookup::player(&state.db, id).await?;
    let (team, league) = lookup::team_with_league(&state.db, player.team_id).await?;
    access::ensure_can_view_league(&user, &league)?;

    Ok(Json(PlayerDetail { player, team }))
}

async fn update_player(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePlayerRequest>,
) -> Result<Json<player::Model>, AppError> {
    let existing = lookup::player(&state.db, id).await?;
    writable_team(&state, &user, existing.team_id).await?;

    let date_of_birth = body.date_of_birth.as_deref().map(birth_date).transpose()?;
    validate_details(
        body.contact_email.as_deref(),
        [
            ("jersey_number", body.jersey_number.as_deref()),
            ("position", body.position.as_deref()),
            ("photo_path", body.photo_path.as_deref()),
            ("contact_phone", body.contact_phone.as_deref()),
            ("nationality", body.nationality.as_deref()),
            ("height", body.height.as_deref()),
            ("weight", body.weight.as_deref()),
        ],
    )?;

    let mut active: player::ActiveModel = existing.clone().into();
    if let Some(first_name) = &body.first_name {
        active.first_name =
            Set(required_text("first_name", first_name).map_err(AppError::Validation)?);
    }
    if let Some(last_name) = &body.last_name {
        active.last_name =
            Set(required_text("last_name", last_name).map_err(AppError::Validation)?);
    }
    if let Some(date_of_birth) = date_of_birth {
        active.date_of_birth = Set(Some(date_of_birth));
    }
    if let Some(jersey_number) = body.jersey_number {
        active.jersey_number = Set(Some(jersey_number));
    }
    if let Some(position) = body.position {
        active.position = Set(Some(position));
    }
    if let Some(photo_path) = body.photo_path {
        active.photo_path = Set(Some(photo_path));
    }
    if let Some(bio) = body.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(contact_email) = body.contact_email {
        active.contact_email = Set(Some(contact_email));
    }
    if let Some(contact_phone) = body.contact_phone {
        active.contact_phone = Set(Some(contact_phone));
    }
    if let Some(nationality) = body.nationality {
        active.nationality = Set(Some(nationality));
    }
    if let Some(height) = body.height {
        active.height = Set(Some(height));
    }
    if let Some(weight) = body.weight {
        active.weight = Set(Some(weight));
    }
    if let Some(statistics) = body.statistics {
        active.statistics = Set(attributes::to_json(statistics));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_captain) = body.is_captain {
        active.is_captain = Set(is_captain);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;

    Activity::new(
        &user,
        Action::Updated,
        EntityKind::Player,
        updated.id,
        format!("Updated player '{}'", updated.full_name()),
    )
    .before(&existing)
    .after(&updated)
    .record(&state.db)
    .await;

    Ok(Json(updated))
}

/// Merge the given keys into the player's statistics, keeping the rest.
async fn update_statistics(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatisticsRequest>,
) -> Result<Json<player::Model>, AppError> {
    let existing = lookup::player(&state.db, id).await?;
    writable_team(&state, &user, existing.team_id).await?;

    let merged = attributes::merge(
        attributes::from_json(existing.statistics.as_ref()),
        body.statistics,
    );

    let mut active: player::ActiveModel = existing.clone().into();
    active.statistics = Set(attributes::to_json(merged));
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(&state.db).await?;

    Activity::new(
        &user,
        Action::Updated,
        EntityKind::Player,
        updated.id,
        format!("Updated statistics for player '{}'", updated.full_name()),
    )
    .before(&existing)
    .after(&updated)
    .record(&state.db)
    .await;

    Ok(Json(updated))
}

async fn delete_player(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = lookup::player(&state.db, id).await?;
    let (team, _league) = writable_team(&state, &user, existing.team_id).await?;

    existing.clone().delete(&state.db).await?;

    Activity::new(
        &user,
        Action::Deleted,
        EntityKind::Player,
        id,
        format!("Removed player '{}' from team '{}'", existing.full_name(), team.name),
    )
    .before(&existing)
    .record(&state.db)
    .await;

    Ok(StatusCode::NO_CONTENT)
}
