use sea_orm_migration::prelude::*;

/// Creates the `game_match` table.
///
/// Team references are `RESTRICT`: a team with matches cannot be removed,
/// it has to be deactivated instead.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GameMatch {
    Table,
    Id,
    LeagueId,
    HomeTeamId,
    AwayTeamId,
    MatchDate,
    Venue,
    Status,
    HomeTeamScore,
    AwayTeamScore,
    Referee,
    MatchNotes,
    Statistics,
    IsFeatured,
    WeatherConditions,
    BroadcastChannel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
}

#[async_trait::async_trait]
#[allow(clippy::too_many_lines)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameMatch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameMatch::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameMatch::LeagueId).uuid().not_null())
                    .col(ColumnDef::new(GameMatch::HomeTeamId).uuid().not_null())
                    .col(ColumnDef::new(GameMatch::AwayTeamId).uuid().not_null())
                    .col(
                        ColumnDef::new(GameMatch::MatchDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameMatch::Venue).string_len(255).null())
                    .col(
                        ColumnDef::new(GameMatch::Status)
                            .string_len(20)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(GameMatch::HomeTeamScore).integer().null())
                    .col(ColumnDef::new(GameMatch::AwayTeamScore).integer().null())
                    .col(ColumnDef::new(GameMatch::Referee).string_len(255).null())
                    .col(ColumnDef::new(GameMatch::MatchNotes).text().null())
                    .col(ColumnDef::new(GameMatch::Statistics).json().null())
                    .col(
                        ColumnDef::new(GameMatch::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GameMatch::WeatherConditions)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameMatch::BroadcastChannel)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameMatch::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameMatch::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_match_league_id")
                            .from(GameMatch::Table, GameMatch::LeagueId)
                            .to(League::Table, League::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_match_home_team_id")
                            .from(GameMatch::Table, GameMatch::HomeTeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_match_away_team_id")
                            .from(GameMatch::Table, GameMatch::AwayTeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_match_league_id_match_date")
                    .table(GameMatch::Table)
                    .col(GameMatch::LeagueId)
                    .col(GameMatch::MatchDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_match_home_team_id")
                    .table(GameMatch::Table)
                    .col(GameMatch::HomeTeamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_match_away_team_id")
                    .table(GameMatch::Table)
                    .col(GameMatch::AwayTeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameMatch::Table).to_owned())
            .await
    }
}
