use sea_orm_migration::prelude::*;

/// Creates the append-only `activity_log` audit table.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ActivityLog {
    Table,
    Id,
    UserId,
    Action,
    EntityType,
    EntityId,
    Description,
    OldValues,
    NewValues,
    CreatedAt,
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
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLog::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLog::UserId).uuid().null())
                    .col(ColumnDef::new(ActivityLog::Action).string_len(50).not_null())
                    .col(
                        ColumnDef::new(ActivityLog::EntityType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLog::EntityId).uuid().not_null())
                    .col(ColumnDef::new(ActivityLog::Description).text().not_null())
                    .col(ColumnDef::new(ActivityLog::OldValues).json().null())
                    .col(ColumnDef::new(ActivityLog::NewValues).json().null())
                    .col(
                        ColumnDef::new(ActivityLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_log_user_id")
                            .from(ActivityLog::Table, ActivityLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_entity")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::EntityType)
                    .col(ActivityLog::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_created_at")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await
    }
}
