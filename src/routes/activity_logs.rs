use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Days;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::dto::pagination::DEFAULT_PER_PAGE;
use crate::dto::{PaginatedResponse, PaginationQuery};
use crate::entities::{activity_log, user};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::parse_date;

/// Build the activity log routes (admin only): `/activity-logs/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activity-logs", get(list_logs))
        .route("/activity-logs/actions", get(list_actions))
        .route("/activity-logs/entity-types", get(list_entity_types))
        .route("/activity-logs/{id}", get(show_log))
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityLogQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// `asc` or `desc` by creation time (default `desc`)
    pub order: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize)]
struct ActivityLogDetail {
    #[serde(flatten)]
    log: activity_log::Model,
    user: Option<user::Model>,
}

fn filter_date(field: &str, value: &str) -> Result<chrono::DateTime<chrono::FixedOffset>, AppError> {
    parse_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| {
            AppError::Validation(format!("The {field} field must be a date (YYYY-MM-DD)."))
        })
}

/// Newest first unless `order=asc`. Date bounds are whole UTC days.
async fn list_logs(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ActivityLogQuery>,
) -> Result<Json<PaginatedResponse<activity_log::Model>>, AppError> {
    let mut select = activity_log::Entity::find();

    if let Some(user_id) = query.user_id {
        select = select.filter(activity_log::Column::UserId.eq(user_id));
    }
    if let Some(action) = &query.action {
        select = select.filter(activity_log::Column::Action.eq(action));
    }
    if let Some(entity_type) = &query.entity_type {
        select = select.filter(activity_log::Column::EntityType.eq(entity_type));
    }
    if let Some(entity_id) = query.entity_id {
        select = select.filter(activity_log::Column::EntityId.eq(entity_id));
    }
    if let Some(from) = &query.date_from {
        select = select.filter(activity_log::Column::CreatedAt.gte(filter_date("date_from", from)?));
    }
    if let Some(to) = &query.date_to {
        let until = filter_date("date_to", to)?
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::Validation("The date_to field is out of range.".to_string()))?;
        select = select.filter(activity_log::Column::CreatedAt.lt(until));
    }

    let select = if query.order.as_deref() == Some("asc") {
        select.order_by_asc(activity_log::Column::CreatedAt)
    } else {
        select.order_by_desc(activity_log::Column::CreatedAt)
    };
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let page = PaginatedResponse::fetch(&state.db, select, pagination, DEFAULT_PER_PAGE).await?;

    Ok(Json(page))
}

async fn show_log(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityLogDetail>, AppError> {
    let (log, user) = activity_log::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Activity log"))?;

    Ok(Json(ActivityLogDetail { log, user }))
}

/// Distinct values of `action`, for building filters.
async fn list_actions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<String>>, AppError> {
    let actions = activity_log::Entity::find()
        .select_only()
        .column(activity_log::Column::Action)
        .distinct()
        .order_by_asc(activity_log::Column::Action)
        .into_tuple::<String>()
        .all(&state.db)
        .await?;

    Ok(Json(actions))
}

/// Distinct values of `entity_type`, for building filters.
async fn list_entity_types(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<String>>, AppError> {
    let entity_types = activity_log::Entity::find()
        .select_only()
        .column(activity_log::Column::EntityType)
        .distinct()
        .order_by_asc(activity_log::Column::EntityType)
        .into_tuple::<String>()
        .all(&state.db)
        .await?;

    Ok(Json(entity_types))
}
