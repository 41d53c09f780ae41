//! Team standings: the `wins`/`losses`/`draws`/`points` counters on each team.
//!
//! Counters always equal the fold of the team's completed matches under the league's
//! current point scheme. Incremental updates go through [`apply_result`] and
//! [`revert_result`]; [`recompute_from_history`] rebuilds from scratch.
//!
//! Every function that writes counters expects to run inside a transaction whose
//! teams were loaded with [`lock_teams`].

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::game_match::FinalResult;
use crate::entities::{MatchStatus, game_match, league_setting, team};
use crate::error::AppError;

/// Points awarded per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointScheme {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
}

impl Default for PointScheme {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

impl PointScheme {
    #[must_use]
    pub const fn points_for(self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Draw => self.draw,
            Outcome::Loss => self.loss,
        }
    }
}

impl From<&league_setting::Model> for PointScheme {
    fn from(setting: &league_setting::Model) -> Self {
        Self {
            win: setting.points_for_win,
            draw: setting.points_for_draw,
            loss: setting.points_for_loss,
        }
    }
}

/// Load a league's point scheme, or the default when it has no settings row.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn point_scheme<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
) -> Result<PointScheme, DbErr> {
    let setting = league_setting::Entity::find()
        .filter(league_setting::Column::LeagueId.eq(league_id))
        .one(conn)
        .await?;

    Ok(setting.as_ref().map(PointScheme::from).unwrap_or_default())
}

/// A match result seen from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Higher score wins; equal scores draw.
    #[must_use]
    pub const fn classify(own: i32, opposing: i32) -> Self {
        if own > opposing {
            Self::Win
        } else if own < opposing {
            Self::Loss
        } else {
            Self::Draw
        }
    }
}

/// A team's standings counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub points: i32,
}

impl Record {
    #[must_use]
    pub const fn of(team: &team::Model) -> Self {
        Self {
            wins: team.wins,
            losses: team.losses,
            draws: team.draws,
            points: team.points,
        }
    }

    /// Count one result.
    pub fn credit(&mut self, outcome: Outcome, scheme: PointScheme) {
        *self.counter(outcome) += 1;
        self.points += scheme.points_for(outcome);
    }

    /// Un-count one result. Returns `None` if any counter would go negative, which
    /// means the stored counters do not reflect the result being removed.
    #[must_use]
    pub fn debit(mut self, outcome: Outcome, scheme: PointScheme) -> Option<Self> {
        let counter = self.counter(outcome);
        *counter -= 1;
        if *counter < 0 {
            return None;
        }
        self.points -= scheme.points_for(outcome);
        (self.points >= 0).then_some(self)
    }

    /// Fold `(own, opposing)` scores into a fresh record.
    #[must_use]
    pub fn tally(scores: impl IntoIterator<Item = (i32, i32)>, scheme: PointScheme) -> Self {
        let mut record = Self::default();
        for (own, opposing) in scores {
            record.credit(Outcome::classify(own, opposing), scheme);
        }
        record
    }

    const fn counter(&mut self, outcome: Outcome) -> &mut i32 {
        match outcome {
            Outcome::Win => &mut self.wins,
            Outcome::Draw => &mut self.draws,
            Outcome::Loss => &mut self.losses,
        }
    }
}

/// Teams loaded under an exclusive row lock, keyed by id.
pub type LockedTeams = BTreeMap<Uuid, team::Model>;

/// Load `ids` with `SELECT ... FOR UPDATE`, in id order.
///
/// Backends without row locks (SQLite) serialize writers at the transaction level.
///
/// # Errors
///
/// Returns `NotFound` if any id has no team, or an error if the query fails.
pub async fn lock_teams<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<LockedTeams, AppError> {
    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(team::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?;

    let locked: LockedTeams = teams.into_iter().map(|t| (t.id, t)).collect();
    if ids.iter().any(|id| !locked.contains_key(id)) {
        return Err(AppError::not_found("Team"));
    }
    Ok(locked)
}

/// Count `result` for both teams and persist their counters.
///
/// # Errors
///
/// Returns an error if a team is missing from `teams` or a write fails.
pub async fn apply_result<C: ConnectionTrait>(
    conn: &C,
    teams: &mut LockedTeams,
    result: &FinalResult,
    scheme: PointScheme,
) -> Result<(), AppError> {
    for (team_id, own, opposing) in sides(result) {
        let current = locked(teams, team_id)?;
        let mut record = Record::of(current);
        record.credit(Outcome::classify(own, opposing), scheme);
        let updated = store_record(conn, current.clone(), record).await?;
        teams.insert(team_id, updated);
    }

    tracing::debug!(
        home = %result.home_team_id,
        away = %result.away_team_id,
        score = %format!("{}-{}", result.home_score, result.away_score),
        "Applied match result to standings"
    );
    Ok(())
}

/// Exact inverse of [`apply_result`] for the same arguments.
///
/// # Errors
///
/// Returns an internal error, failing the enclosing transaction, if a counter would go
/// negative. Also fails if a team is missing from `teams` or a write fails.
pub async fn revert_result<C: ConnectionTrait>(
    conn: &C,
    teams: &mut LockedTeams,
    result: &FinalResult,
    scheme: PointScheme,
) -> Result<(), AppError> {
    for (team_id, own, opposing) in sides(result) {
        let current = locked(teams, team_id)?;
        let record = Record::of(current)
            .debit(Outcome::classify(own, opposing), scheme)
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "Standings for team {team_id} do not include the result being reverted"
                ))
            })?;
        let updated = store_record(conn, current.clone(), record).await?;
        teams.insert(team_id, updated);
    }

    tracing::debug!(
        home = %result.home_team_id,
        away = %result.away_team_id,
        score = %format!("{}-{}", result.home_score, result.away_score),
        "Reverted match result from standings"
    );
    Ok(())
}

/// Rebuild one team's counters from its completed matches. Idempotent.
///
/// # Errors
///
/// Returns an error if a query or the write fails.
pub async fn recompute_from_history<C: ConnectionTrait>(
    conn: &C,
    team: team::Model,
    scheme: PointScheme,
) -> Result<team::Model, AppError> {
    let matches = game_match::Entity::find()
        .filter(game_match::Column::Status.eq(MatchStatus::Completed.as_str()))
        .filter(
            Condition::any()
                .add(game_match::Column::HomeTeamId.eq(team.id))
                .add(game_match::Column::AwayTeamId.eq(team.id)),
        )
        .all(conn)
        .await?;

    let scores = matches
        .iter()
        .filter_map(game_match::Model::final_result)
        .map(|result| {
            if result.home_team_id == team.id {
                (result.home_score, result.away_score)
            } else {
                (result.away_score, result.home_score)
            }
        });

    let record = Record::tally(scores, scheme);
    if record == Record::of(&team) {
        return Ok(team);
    }
    Ok(store_record(conn, team, record).await?)
}

/// Recompute every team of a league, e.g. after its point scheme changed.
///
/// # Errors
///
/// Returns an error if a query or write fails.
pub async fn recompute_league<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
    scheme: PointScheme,
) -> Result<Vec<team::Model>, AppError> {
    let teams = team::Entity::find()
        .filter(team::Column::LeagueId.eq(league_id))
        .order_by_asc(team::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?;

    let mut recomputed = Vec::with_capacity(teams.len());
    for team in teams {
        recomputed.push(recompute_from_history(conn, team, scheme).await?);
    }

    tracing::info!(%league_id, teams = recomputed.len(), "Recomputed league standings");
    Ok(recomputed)
}

/// `(team, own score, opposing score)` for both sides of a result.
const fn sides(result: &FinalResult) -> [(Uuid, i32, i32); 2] {
    [
        (result.home_team_id, result.home_score, result.away_score),
        (result.away_team_id, result.away_score, result.home_score),
    ]
}

fn locked(teams: &LockedTeams, team_id: Uuid) -> Result<&team::Model, AppError> {
    teams.get(&team_id).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Team {team_id} was not locked before updating standings"))
    })
}

async fn store_record<C: ConnectionTrait>(
    conn: &C,
    team: team::Model,
    record: Record,
) -> Result<team::Model, DbErr> {
    let mut active: team::ActiveModel = team.into();
    active.wins = Set(record.wins);
    active.losses = Set(record.losses);
    active.draws = Set(record.draws);
    active.points = Set(record.points);
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(conn).await
}
