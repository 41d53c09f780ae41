use sea_orm_migration::prelude::*;

/// Creates the `league_setting` table: permission flags and the point scheme, one row per league.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum LeagueSetting {
    Table,
    Id,
    LeagueId,
    BlockTeamAdmins,
    AllowStatsEntry,
    AllowDivisionMatches,
    HomeTeamChangeDate,
    HomeTeamChangeTime,
    HomeTeamChangeStatus,
    HomeTeamChangeVenue,
    AwayTeamChangeDate,
    AwayTeamChangeTime,
    AwayTeamChangeStatus,
    AwayTeamChangeVenue,
    RequireMatchApproval,
    AutoApproveResults,
    AllowOfficialsMarking,
    RequireOfficials,
    SuspendOnRedCard,
    YellowCardsForSuspension,
    PointsForWin,
    PointsForDraw,
    PointsForLoss,
    CustomTerminology,
    AdditionalSettings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
}

fn flag(column: LeagueSetting, default: bool) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

fn points(column: LeagueSetting, default: i32) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(default)
        .to_owned()
}

#[async_trait::async_trait]
#[allow(clippy::too_many_lines)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeagueSetting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeagueSetting::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeagueSetting::LeagueId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(flag(LeagueSetting::BlockTeamAdmins, false))
                    .col(flag(LeagueSetting::AllowStatsEntry, true))
                    .col(flag(LeagueSetting::AllowDivisionMatches, true))
                    .col(flag(LeagueSetting::HomeTeamChangeDate, false))
                    .col(flag(LeagueSetting::HomeTeamChangeTime, false))
                    .col(flag(LeagueSetting::HomeTeamChangeStatus, false))
                    .col(flag(LeagueSetting::HomeTeamChangeVenue, false))
                    .col(flag(LeagueSetting::AwayTeamChangeDate, false))
                    .col(flag(LeagueSetting::AwayTeamChangeTime, false))
                    .col(flag(LeagueSetting::AwayTeamChangeStatus, false))
                    .col(flag(LeagueSetting::AwayTeamChangeVenue, false))
                    .col(flag(LeagueSetting::RequireMatchApproval, false))
                    .col(flag(LeagueSetting::AutoApproveResults, false))
                    .col(flag(LeagueSetting::AllowOfficialsMarking, true))
                    .col(flag(LeagueSetting::RequireOfficials, false))
                    .col(flag(LeagueSetting::SuspendOnRedCard, true))
                    .col(points(LeagueSetting::YellowCardsForSuspension, 3))
                    .col(points(LeagueSetting::PointsForWin, 3))
                    .col(points(LeagueSetting::PointsForDraw, 1))
                    .col(points(LeagueSetting::PointsForLoss, 0))
                    .col(ColumnDef::new(LeagueSetting::CustomTerminology).json().null())
                    .col(ColumnDef::new(LeagueSetting::AdditionalSettings).json().null())
                    .col(
                        ColumnDef::new(LeagueSetting::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeagueSetting::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_setting_league_id")
                            .from(LeagueSetting::Table, LeagueSetting::LeagueId)
                            .to(League::Table, League::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeagueSetting::Table).to_owned())
            .await
    }
}
