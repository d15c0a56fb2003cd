//! Migration: pricing tiers and payments.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_people_tables::Alumnos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tarifas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tarifas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tarifas::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Tarifas::WorkshopCount).integer().not_null())
                    .col(ColumnDef::new(Tarifas::MonthlyAmount).big_integer().not_null())
                    .col(ColumnDef::new(Tarifas::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Tarifas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tarifas::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One active tier per package size
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_tarifas_activas \
                 ON tarifas (workshop_count) WHERE active",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pagos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pagos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pagos::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Pagos::PeriodYear).integer().not_null())
                    .col(
                        ColumnDef::new(Pagos::PeriodMonth)
                            .integer()
                            .not_null()
                            .check(Expr::col(Pagos::PeriodMonth).between(1, 12)),
                    )
                    .col(
                        ColumnDef::new(Pagos::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Pagos::Amount).gt(0)),
                    )
                    .col(ColumnDef::new(Pagos::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Pagos::PaidOn).date().not_null())
                    .col(ColumnDef::new(Pagos::Notes).string_len(500).null())
                    .col(ColumnDef::new(Pagos::RecordedBy).uuid().null())
                    .col(
                        ColumnDef::new(Pagos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Pagos::VoidedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Pagos::VoidReason).string_len(500).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pagos_alumno")
                            .from(Pagos::Table, Pagos::StudentId)
                            .to(Alumnos::Table, Alumnos::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pagos_periodo")
                    .table(Pagos::Table)
                    .col(Pagos::PeriodYear)
                    .col(Pagos::PeriodMonth)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pagos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tarifas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tarifas {
    Table,
    Id,
    Name,
    WorkshopCount,
    MonthlyAmount,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Pagos {
    Table,
    Id,
    StudentId,
    PeriodYear,
    PeriodMonth,
    Amount,
    Method,
    PaidOn,
    Notes,
    RecordedBy,
    CreatedAt,
    VoidedAt,
    VoidReason,
}
