use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::MatchStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_match")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub league_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: DateTimeWithTimeZone,
    pub venue: Option<String>,
    pub status: String,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub referee: Option<String>,
    pub match_notes: Option<String>,
    pub statistics: Option<Json>,
    pub is_featured: bool,
    pub weather_conditions: Option<String>,
    pub broadcast_channel: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// The part of a match that feeds the standings: who played and the final score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalResult {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
}

impl Model {
    /// The stored status; unknown values are treated as `scheduled`.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status.parse().unwrap_or_default()
    }

    /// The result currently counted in the standings, if the match is completed.
    #[must_use]
    pub fn final_result(&self) -> Option<FinalResult> {
        if self.status() != MatchStatus::Completed {
            return None;
        }
        Some(FinalResult {
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            home_score: self.home_team_score?,
            away_score: self.away_team_score?,
        })
    }

    /// Whether `team_id` plays in this match.
    #[must_use]
    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id"
    )]
    League,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::HomeTeamId",
        to = "super::team::Column::Id"
    )]
    HomeTeam,
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::AwayTeamId",
        to = "super::team::Column::Id"
    )]
    AwayTeam,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
