//! Row lookups shared by the route handlers, mapping absence to `NotFound`.

use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::entities::{game_match, league, player, team};
use crate::error::AppError;

pub async fn league(db: &DatabaseConnection, id: Uuid) -> Result<league::Model, AppError> {
    league::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("League"))
}

pub async fn team(db: &DatabaseConnection, id: Uuid) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Team"))
}

pub async fn player(db: &DatabaseConnection, id: Uuid) -> Result<player::Model, AppError> {
    player::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Player"))
}

pub async fn game_match(db: &DatabaseConnection, id: Uuid) -> Result<game_match::Model, AppError> {
    game_match::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Match"))
}

/// A team together with the league that owns it.
pub async fn team_with_league(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<(team::Model, league::Model), AppError> {
    let team = team(db, id).await?;
    let league = league(db, team.league_id).await?;
    Ok((team, league))
}
