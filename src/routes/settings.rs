use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::access::{self, LEAGUE_ADMIN};
use crate::auth::middleware::AuthUser;
use crate::entities::league_setting;
use crate::error::AppError;
use crate::routes::lookup;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::services::standings::{self, PointScheme};
use crate::state::AppState;
use crate::utils::validate::non_negative;
use crate::utils::{Attributes, attributes};

/// Build the league settings routes: `/leagues/{id}/settings`
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/leagues/{id}/settings",
        get(show_settings).put(update_settings),
    )
}

#[derive(Debug, Default, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateSettingsRequest {
    pub block_team_admins: Option<bool>,
    pub allow_stats_entry: Option<bool>,
    pub allow_division_matches: Option<bool>,
    pub home_team_change_date: Option<bool>,
    pub home_team_change_time: Option<bool>,
    pub home_team_change_status: Option<bool>,
    pub home_team_change_venue: Option<bool>,
    pub away_team_change_date: Option<bool>,
    pub away_team_change_time: Option<bool>,
    pub away_team_change_status: Option<bool>,
    pub away_team_change_venue: Option<bool>,
    pub require_match_approval: Option<bool>,
    pub auto_approve_results: Option<bool>,
    pub allow_officials_marking: Option<bool>,
    pub require_officials: Option<bool>,
    pub suspend_on_red_card: Option<bool>,
    pub yellow_cards_for_suspension: Option<i32>,
    pub points_for_win: Option<i32>,
    pub points_for_draw: Option<i32>,
    pub points_for_loss: Option<i32>,
    pub custom_terminology: Option<Attributes>,
    pub additional_settings: Option<Attributes>,
}

impl UpdateSettingsRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(cards) = self.yellow_cards_for_suspension
            && cards < 1
        {
            return Err("The yellow_cards_for_suspension field must be at least 1.".to_string());
        }
        for (field, value) in [
            ("points_for_win", self.points_for_win),
            ("points_for_draw", self.points_for_draw),
            ("points_for_loss", self.points_for_loss),
        ] {
            if let Some(value) = value {
                non_negative(field, value)?;
            }
        }
        Ok(())
    }
}

async fn show_settings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
) -> Result<Json<league_setting::Model>, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    access::ensure_owner_or(&user, &league, LEAGUE_ADMIN)?;

    let settings = league_setting::Entity::find()
        .filter(league_setting::Column::LeagueId.eq(league_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("League settings"))?;

    Ok(Json(settings))
}

/// Partial update; creates the settings row if the league has none. A changed point
/// scheme recomputes every team of the league in the same transaction.
async fn update_settings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(league_id): Path<Uuid>,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<league_setting::Model>, AppError> {
    let league = lookup::league(&state.db, league_id).await?;
    access::ensure_owner_or(&user, &league, LEAGUE_ADMIN)?;
    body.validate().map_err(AppError::Validation)?;

    let now = Utc::now().fixed_offset();
    let txn = state.db.begin().await?;

    let existing = match league_setting::Entity::find()
        .filter(league_setting::Column::LeagueId.eq(league_id))
        .one(&txn)
        .await?
    {
        Some(existing) => existing,
        None => league_setting::defaults_for(league_id, now).insert(&txn).await?,
    };
    let old_scheme = PointScheme::from(&existing);

    let mut active: league_setting::ActiveModel = existing.clone().into();

    macro_rules! assign {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(value) = body.$field {
                    active.$field = Set(value);
                }
            )*
        };
    }
    assign!(
        block_team_admins,
        allow_stats_entry,
        allow_division_matches,
        home_team_change_date,
        home_team_change_time,
        home_team_change_status,
        home_team_change_venue,
        away_team_change_date,
        away_team_change_time,
        away_team_change_status,
        away_team_change_venue,
        require_match_approval,
        auto_approve_results,
        allow_officials_marking,
        require_officials,
        suspend_on_red_card,
        yellow_cards_for_suspension,
        points_for_win,
        points_for_draw,
        points_for_loss,
    );
    if let Some(custom_terminology) = body.custom_terminology {
        active.custom_terminology = Set(attributes::to_json(custom_terminology));
    }
    if let Some(additional_settings) = body.additional_settings {
        active.additional_settings = Set(attributes::to_json(additional_settings));
    }
    active.updated_at = Set(now);

    let updated = active.update(&txn).await?;

    let new_scheme = PointScheme::from(&updated);
    if new_scheme != old_scheme {
        standings::recompute_league(&txn, league_id, new_scheme).await?;
    }

    txn.commit().await?;

    Activity::new(
        &user,
        Action::Updated,
        EntityKind::LeagueSettings,
        updated.id,
        format!("Updated settings for league '{}'", league.name),
    )
    .before(&existing)
    .after(&updated)
    .record(&state.db)
    .await;

    Ok(Json(updated))
}
