use sea_orm_migration::prelude::*;

/// Creates the `league` table.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
    UserId,
    Name,
    Slug,
    Country,
    Type,
    SportType,
    SeasonName,
    SeasonStartDate,
    SeasonEndDate,
    WebsiteUrl,
    LogoPath,
    Description,
    IsPublic,
    IsActive,
    Settings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(League::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(League::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(League::UserId).uuid().not_null())
                    .col(ColumnDef::new(League::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(League::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(League::Country).string_len(255).not_null())
                    .col(ColumnDef::new(League::Type).string_len(255).not_null())
                    .col(ColumnDef::new(League::SportType).string_len(255).not_null())
                    .col(ColumnDef::new(League::SeasonName).string_len(255).not_null())
                    .col(ColumnDef::new(League::SeasonStartDate).date().not_null())
                    .col(ColumnDef::new(League::SeasonEndDate).date().not_null())
                    .col(ColumnDef::new(League::WebsiteUrl).string_len(255).null())
                    .col(ColumnDef::new(League::LogoPath).string_len(255).null())
                    .col(ColumnDef::new(League::Description).text().null())
                    .col(
                        ColumnDef::new(League::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(League::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(League::Settings).json().null())
                    .col(
                        ColumnDef::new(League::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(League::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_user_id")
                            .from(League::Table, League::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(League::Table).to_owned())
            .await
    }
}
