use sea_orm_migration::prelude::*;

/// Creates the `team` table, including the derived standings counters.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    LeagueId,
    Name,
    Slug,
    LogoPath,
    Description,
    HomeVenue,
    TeamColor,
    ContactEmail,
    ContactPhone,
    Website,
    Wins,
    Losses,
    Draws,
    Points,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
}

fn counter(column: Team) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Team::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Team::LeagueId).uuid().not_null())
                    .col(ColumnDef::new(Team::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Team::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Team::LogoPath).string_len(255).null())
                    .col(ColumnDef::new(Team::Description).text().null())
                    .col(ColumnDef::new(Team::HomeVenue).string_len(255).null())
                    .col(ColumnDef::new(Team::TeamColor).string_len(255).null())
                    .col(ColumnDef::new(Team::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(Team::ContactPhone).string_len(255).null())
                    .col(ColumnDef::new(Team::Website).string_len(255).null())
                    .col(counter(Team::Wins))
                    .col(counter(Team::Losses))
                    .col(counter(Team::Draws))
                    .col(counter(Team::Points))
                    .col(
                        ColumnDef::new(Team::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Team::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Team::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_league_id")
                            .from(Team::Table, Team::LeagueId)
                            .to(League::Table, League::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_league_id")
                    .table(Team::Table)
                    .col(Team::LeagueId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await
    }
}
