use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "league_setting")]
#[allow(clippy::struct_excessive_bools)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub league_id: Uuid,
    pub block_team_admins: bool,
    pub allow_stats_entry: bool,
    pub allow_division_matches: bool,
    pub home_team_change_date: bool,
    pub home_team_change_time: bool,
    pub home_team_change_status: bool,
    pub home_team_change_venue: bool,
    pub away_team_change_date: bool,
    pub away_team_change_time: bool,
    pub away_team_change_status: bool,
    pub away_team_change_venue: bool,
    pub require_match_approval: bool,
    pub auto_approve_results: bool,
    pub allow_officials_marking: bool,
    pub require_officials: bool,
    pub suspend_on_red_card: bool,
    pub yellow_cards_for_suspension: i32,
    pub points_for_win: i32,
    pub points_for_draw: i32,
    pub points_for_loss: i32,
    pub custom_terminology: Option<Json>,
    pub additional_settings: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id"
    )]
    League,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A settings row for `league_id` holding the column defaults (3/1/0 point scheme).
#[must_use]
pub fn defaults_for(league_id: Uuid, now: DateTimeWithTimeZone) -> ActiveModel {
    use sea_orm::ActiveValue::Set;

    ActiveModel {
        id: Set(Uuid::new_v4()),
        league_id: Set(league_id),
        block_team_admins: Set(false),
        allow_stats_entry: Set(true),
        allow_division_matches: Set(true),
        home_team_change_date: Set(false),
        home_team_change_time: Set(false),
        home_team_change_status: Set(false),
        home_team_change_venue: Set(false),
        away_team_change_date: Set(false),
        away_team_change_time: Set(false),
        away_team_change_status: Set(false),
        away_team_change_venue: Set(false),
        require_match_approval: Set(false),
        auto_approve_results: Set(false),
        allow_officials_marking: Set(true),
        require_officials: Set(false),
        suspend_on_red_card: Set(true),
        yellow_cards_for_suspension: Set(3),
        points_for_win: Set(3),
        points_for_draw: Set(1),
        points_for_loss: Set(0),
        custom_terminology: Set(None),
        additional_settings: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
