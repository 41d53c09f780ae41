use sea_orm_migration::prelude::*;

/// Creates the `player` table for team rosters.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Player {
    Table,
    Id,
    TeamId,
    FirstName,
    LastName,
    JerseyNumber,
    DateOfBirth,
    Position,
    PhotoPath,
    Bio,
    ContactEmail,
    ContactPhone,
    Nationality,
    Height,
    Weight,
    Statistics,
    IsActive,
    IsCaptain,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Player::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Player::TeamId).uuid().not_null())
                    .col(ColumnDef::new(Player::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Player::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(Player::JerseyNumber).string_len(20).null())
                    .col(ColumnDef::new(Player::DateOfBirth).date().null())
                    .col(ColumnDef::new(Player::Position).string_len(255).null())
                    .col(ColumnDef::new(Player::PhotoPath).string_len(255).null())
                    .col(ColumnDef::new(Player::Bio).text().null())
                    .col(ColumnDef::new(Player::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(Player::ContactPhone).string_len(255).null())
                    .col(ColumnDef::new(Player::Nationality).string_len(255).null())
                    .col(ColumnDef::new(Player::Height).string_len(20).null())
                    .col(ColumnDef::new(Player::Weight).string_len(20).null())
                    .col(ColumnDef::new(Player::Statistics).json().null())
                    .col(
                        ColumnDef::new(Player::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Player::IsCaptain)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Player::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Player::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_team_id")
                            .from(Player::Table, Player::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_player_team_id")
                    .table(Player::Table)
                    .col(Player::TeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Player::Table).to_owned())
            .await
    }
}
