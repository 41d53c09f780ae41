pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_api_token_table;
mod m20260302_000001_create_league_table;
mod m20260302_000002_create_league_setting_table;
mod m20260302_000003_create_team_table;
mod m20260302_000004_create_player_table;
mod m20260302_000005_create_game_match_table;
mod m20260303_000001_create_activity_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_api_token_table::Migration),
            Box::new(m20260302_000001_create_league_table::Migration),
            Box::new(m20260302_000002_create_league_setting_table::Migration),
            Box::new(m20260302_000003_create_team_table::Migration),
            Box::new(m20260302_000004_create_player_table::Migration),
            Box::new(m20260302_000005_create_game_match_table::Migration),
            Box::new(m20260303_000001_create_activity_log_table::Migration),
        ]
    }
}
