//! Match lifecycle: create, update, delete and score matches while keeping team
//! standings in step.
//!
//! Statuses may follow each other freely. Only the completed result matters to the
//! standings: whenever it changes (entering or leaving `completed`, or editing the
//! teams or scores of a completed match) the old result is reverted and the new one
//! applied inside one transaction that holds row locks on every affected team.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::dto::{CreateMatchRequest, UpdateMatchRequest};
use crate::entities::game_match::FinalResult;
use crate::entities::{MatchStatus, game_match, league, team, user};
use crate::error::AppError;
use crate::services::activity::{Action, Activity, EntityKind};
use crate::services::standings;
use crate::utils::{attributes, parse_datetime};

pub struct MatchService;

/// The two teams of a match, validated against the match's league.
struct Fixture {
    home: team::Model,
    away: team::Model,
}

impl Fixture {
    fn describe(&self) -> String {
        format!("{} and {}", self.home.name, self.away.name)
    }
}

impl MatchService {
    /// Schedule a match in `league`. A match created as completed counts toward the
    /// standings immediately.
    ///
    /// # Errors
    ///
    /// `Validation` for bad input, `NotFound` for unknown teams, `Internal` on storage
    /// failure.
    pub async fn create(
        db: &DatabaseConnection,
        actor: &user::Model,
        league: &league::Model,
        request: CreateMatchRequest,
    ) -> Result<game_match::Model, AppError> {
        let fixture =
            Self::load_fixture(db, league.id, request.home_team_id, request.away_team_id).await?;
        let match_date = parse_match_date(&request.match_date)?;
        let status = parse_status(request.status.as_deref())?.unwrap_or_default();
        let (home_team_score, away_team_score) = resolve_scores(
            status,
            request.home_team_score,
            request.away_team_score,
            (None, None),
        )?;

        let now = Utc::now().fixed_offset();
        let new_match = game_match::ActiveModel {
            id: Set(Uuid::new_v4()),
            league_id: Set(league.id),
            home_team_id: Set(fixture.home.id),
            away_team_id: Set(fixture.away.id),
            match_date: Set(match_date),
            venue: Set(request.venue.or_else(|| fixture.home.home_venue.clone())),
            status: Set(status.as_str().to_string()),
            home_team_score: Set(home_team_score),
            away_team_score: Set(away_team_score),
            referee: Set(request.referee),
            match_notes: Set(request.match_notes),
            statistics: Set(request.statistics.and_then(attributes::to_json)),
            is_featured: Set(request.is_featured.unwrap_or(false)),
            weather_conditions: Set(request.weather_conditions),
            broadcast_channel: Set(request.broadcast_channel),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = if status == MatchStatus::Completed {
            let txn = db.begin().await?;
            let created = new_match.insert(&txn).await?;
            Self::settle(&txn, league.id, None, created.final_result()).await?;
            txn.commit().await?;
            created
        } else {
            new_match.insert(db).await?
        };

        tracing::info!(match_id = %created.id, league_id = %league.id, status = %status, "Match created");

        Activity::new(
            actor,
            Action::Created,
            EntityKind::Match,
            created.id,
            format!("Created match between {}", fixture.describe()),
        )
        .after(&created)
        .record(db)
        .await;

        Ok(created)
    }

    /// Apply a partial update to the match `existing` refers to.
    ///
    /// The row is re-read under an exclusive lock inside the transaction, so the
    /// previous result and any fallback scores come from the committed state rather
    /// than from `existing`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the match is gone, `Validation` for bad input, `NotFound` for
    /// unknown teams, `Internal` on storage failure or inconsistent standings. Nothing
    /// is written on error.
    pub async fn update(
        db: &DatabaseConnection,
        actor: &user::Model,
        existing: game_match::Model,
        request: UpdateMatchRequest,
    ) -> Result<game_match::Model, AppError> {
        let txn = db.begin().await?;
        let current = Self::lock_match(&txn, existing.id).await?;

        let home_team_id = request.home_team_id.unwrap_or(current.home_team_id);
        let away_team_id = request.away_team_id.unwrap_or(current.away_team_id);
        let fixture =
            Self::load_fixture(&txn, current.league_id, home_team_id, away_team_id).await?;

        let old_status = current.status();
        let status = parse_status(request.status.as_deref())?.unwrap_or(old_status);
        let (home_team_score, away_team_score) = resolve_scores(
            status,
            request.home_team_score,
            request.away_team_score,
            (current.home_team_score, current.away_team_score),
        )?;
        let match_date = request
            .match_date
            .as_deref()
            .map(parse_match_date)
            .transpose()?;

        let mut active: game_match::ActiveModel = current.clone().into();
        active.home_team_id = Set(home_team_id);
        active.away_team_id = Set(away_team_id);
        active.status = Set(status.as_str().to_string());
        active.home_team_score = Set(home_team_score);
        active.away_team_score = Set(away_team_score);
        if let Some(match_date) = match_date {
            active.match_date = Set(match_date);
        }
        if let Some(venue) = request.venue {
            active.venue = Set(Some(venue));
        }
        if let Some(referee) = request.referee {
            active.referee = Set(Some(referee));
        }
        if let Some(match_notes) = request.match_notes {
            active.match_notes = Set(Some(match_notes));
        }
        if let Some(statistics) = request.statistics {
            active.statistics = Set(attributes::to_json(statistics));
        }
        if let Some(is_featured) = request.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(weather_conditions) = request.weather_conditions {
            active.weather_conditions = Set(Some(weather_conditions));
        }
        if let Some(broadcast_channel) = request.broadcast_channel {
            active.broadcast_channel = Set(Some(broadcast_channel));
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let old_result = current.final_result();
        let new_result = (status == MatchStatus::Completed).then(|| FinalResult {
            home_team_id,
            away_team_id,
            home_score: home_team_score.unwrap_or_default(),
            away_score: away_team_score.unwrap_or_default(),
        });

        if old_result != new_result {
            Self::settle(&txn, current.league_id, old_result, new_result).await?;
        }
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        if old_status != status {
            tracing::info!(match_id = %updated.id, from = %old_status, to = %status, "Match status changed");
        }

        Activity::new(
            actor,
            Action::Updated,
            EntityKind::Match,
            updated.id,
            format!("Updated match between {}", fixture.describe()),
        )
        .before(&current)
        .after(&updated)
        .record(db)
        .await;

        Ok(updated)
    }

    /// Record a final score: an update to `completed` with both scores.
    ///
    /// # Errors
    ///
    /// As [`MatchService::update`].
    pub async fn record_score(
        db: &DatabaseConnection,
        actor: &user::Model,
        existing: game_match::Model,
        home_team_score: i32,
        away_team_score: i32,
    ) -> Result<game_match::Model, AppError> {
        let request = UpdateMatchRequest {
            status: Some(MatchStatus::Completed.as_str().to_string()),
            home_team_score: Some(home_team_score),
            away_team_score: Some(away_team_score),
            ..UpdateMatchRequest::default()
        };
        Self::update(db, actor, existing, request).await
    }

    /// Delete the match `existing` refers to, removing its result from the standings
    /// if the locked row is completed.
    ///
    /// # Errors
    ///
    /// `NotFound` if the match is already gone, `Internal` on storage failure or
    /// inconsistent standings.
    pub async fn delete(
        db: &DatabaseConnection,
        actor: &user::Model,
        existing: game_match::Model,
    ) -> Result<(), AppError> {
        let txn = db.begin().await?;
        let current = Self::lock_match(&txn, existing.id).await?;

        let description = match Self::team_names(&txn, &current).await {
            Some(names) => format!("Deleted match between {names}"),
            None => "Deleted match".to_string(),
        };

        if let Some(result) = current.final_result() {
            Self::settle(&txn, current.league_id, Some(result), None).await?;
        }
        game_match::Entity::delete_by_id(current.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(match_id = %current.id, "Match deleted");

        Activity::new(actor, Action::Deleted, EntityKind::Match, current.id, description)
            .before(&current)
            .record(db)
            .await;

        Ok(())
    }

    /// Re-read a match under an exclusive row lock.
    async fn lock_match<C: ConnectionTrait>(
        txn: &C,
        match_id: Uuid,
    ) -> Result<game_match::Model, AppError> {
        game_match::Entity::find_by_id(match_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Match"))
    }

    /// Move the standings from `old` to `new` inside `txn`.
    async fn settle<C: ConnectionTrait>(
        txn: &C,
        league_id: Uuid,
        old: Option<FinalResult>,
        new: Option<FinalResult>,
    ) -> Result<(), AppError> {
        let mut ids: Vec<Uuid> = old
            .iter()
            .chain(new.iter())
            .flat_map(|r| [r.home_team_id, r.away_team_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        // Scheme is read under the team locks a settings recompute also takes.
        let mut teams = standings::lock_teams(txn, &ids).await?;
        let scheme = standings::point_scheme(txn, league_id).await?;

        if let Some(old) = old {
            standings::revert_result(txn, &mut teams, &old, scheme).await?;
        }
        if let Some(new) = new {
            standings::apply_result(txn, &mut teams, &new, scheme).await?;
        }
        Ok(())
    }

    /// Load and validate both teams of a match in `league_id`.
    async fn load_fixture<C: ConnectionTrait>(
        db: &C,
        league_id: Uuid,
        home_team_id: Uuid,
        away_team_id: Uuid,
    ) -> Result<Fixture, AppError> {
        if home_team_id == away_team_id {
            return Err(AppError::Validation(
                "The home and away teams must be different.".to_string(),
            ));
        }

        let home = team::Entity::find_by_id(home_team_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Home team"))?;
        let away = team::Entity::find_by_id(away_team_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Away team"))?;

        if home.league_id != league_id {
            return Err(AppError::Validation(
                "Home team must belong to the same league.".to_string(),
            ));
        }
        if away.league_id != league_id {
            return Err(AppError::Validation(
                "Away team must belong to the same league.".to_string(),
            ));
        }

        Ok(Fixture { home, away })
    }

    async fn team_names<C: ConnectionTrait>(db: &C, m: &game_match::Model) -> Option<String> {
        let home = team::Entity::find_by_id(m.home_team_id).one(db).await.ok()??;
        let away = team::Entity::find_by_id(m.away_team_id).one(db).await.ok()??;
        Some(Fixture { home, away }.describe())
    }
}

/// Match dates are stored in UTC so they order correctly on every backend.
fn parse_match_date(value: &str) -> Result<DateTime<FixedOffset>, AppError> {
    parse_datetime(value)
        .map(|date| date.with_timezone(&Utc).fixed_offset())
        .ok_or_else(|| AppError::Validation(format!("Invalid match date '{value}'.")))
}

fn parse_status(value: Option<&str>) -> Result<Option<MatchStatus>, AppError> {
    value
        .map(|s| s.parse::<MatchStatus>().map_err(AppError::Validation))
        .transpose()
}

/// Decide the stored scores for a match about to have `status`.
///
/// A completed match needs both scores, taken from the request or else from the
/// stored row. Any other status stores no scores, and sending one is an error.
fn resolve_scores(
    status: MatchStatus,
    home: Option<i32>,
    away: Option<i32>,
    stored: (Option<i32>, Option<i32>),
) -> Result<(Option<i32>, Option<i32>), AppError> {
    if !status.has_scores() {
        if home.is_some() || away.is_some() {
            return Err(AppError::Validation(
                "Scores can only be set on a completed match.".to_string(),
            ));
        }
        return Ok((None, None));
    }

    let (Some(home), Some(away)) = (home.or(stored.0), away.or(stored.1)) else {
        return Err(AppError::Validation(
            "A completed match requires both home_team_score and away_team_score.".to_string(),
        ));
    };
    if home < 0 || away < 0 {
        return Err(AppError::Validation(
            "Scores must be zero or greater.".to_string(),
        ));
    }
    Ok((Some(home), Some(away)))
}
