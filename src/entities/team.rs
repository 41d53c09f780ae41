use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A team within a league.
///
/// `wins`, `losses`, `draws` and `points` are derived from completed matches and are
/// only ever written by the standings service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub logo_path: Option<String>,
    pub description: Option<String>,
    pub home_venue: Option<String>,
    pub team_color: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub points: i32,
    pub is_active: bool,
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
    #[sea_orm(has_many = "super::player::Entity")]
    Players,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
