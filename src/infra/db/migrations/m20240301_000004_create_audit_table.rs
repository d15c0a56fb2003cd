//! Migration: audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Auditoria::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Auditoria::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Auditoria::ActorId).uuid().null())
                    .col(ColumnDef::new(Auditoria::Action).string_len(16).not_null())
                    .col(ColumnDef::new(Auditoria::Entity).string_len(40).not_null())
                    .col(ColumnDef::new(Auditoria::EntityId).uuid().null())
                    .col(ColumnDef::new(Auditoria::Details).json_binary().not_null())
                    .col(
                        ColumnDef::new(Auditoria::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auditoria_entidad")
                    .table(Auditoria::Table)
                    .col(Auditoria::Entity)
                    .col(Auditoria::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auditoria_fecha")
                    .table(Auditoria::Table)
                    .col(Auditoria::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Auditoria::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Auditoria {
    Table,
    Id,
    ActorId,
    Action,
    Entity,
    EntityId,
    Details,
    CreatedAt,
}
