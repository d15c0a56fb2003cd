//! Migration: staff, family groups and students.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Personal::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Personal::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Personal::FirstName).string_len(120).not_null())
                    .col(ColumnDef::new(Personal::LastName).string_len(120).not_null())
                    .col(ColumnDef::new(Personal::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Personal::Phone).string_len(40).null())
                    .col(
                        ColumnDef::new(Personal::Role)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Personal::Role).is_in(["admin", "coordinator", "teacher"])),
                    )
                    .col(ColumnDef::new(Personal::Active).boolean().not_null().default(true))
                    .col(timestamp(Personal::CreatedAt))
                    .col(timestamp(Personal::UpdatedAt))
                    .col(ColumnDef::new(Personal::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GruposFamiliares::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GruposFamiliares::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GruposFamiliares::Name).string_len(120).not_null())
                    .col(ColumnDef::new(GruposFamiliares::ContactName).string_len(120).null())
                    .col(ColumnDef::new(GruposFamiliares::ContactPhone).string_len(40).null())
                    .col(ColumnDef::new(GruposFamiliares::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(GruposFamiliares::Notes).text().null())
                    .col(timestamp(GruposFamiliares::CreatedAt))
                    .col(timestamp(GruposFamiliares::UpdatedAt))
                    .col(ColumnDef::new(GruposFamiliares::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alumnos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Alumnos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Alumnos::FirstName).string_len(120).not_null())
                    .col(ColumnDef::new(Alumnos::LastName).string_len(120).not_null())
                    .col(ColumnDef::new(Alumnos::Document).string_len(16).null().unique_key())
                    .col(ColumnDef::new(Alumnos::BirthDate).date().null())
                    .col(ColumnDef::new(Alumnos::Phone).string_len(40).null())
                    .col(ColumnDef::new(Alumnos::Email).string_len(255).null())
                    .col(ColumnDef::new(Alumnos::FamilyGroupId).uuid().null())
                    .col(ColumnDef::new(Alumnos::Notes).text().null())
                    .col(ColumnDef::new(Alumnos::Active).boolean().not_null().default(true))
                    .col(timestamp(Alumnos::CreatedAt))
                    .col(timestamp(Alumnos::UpdatedAt))
                    .col(ColumnDef::new(Alumnos::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alumnos_grupo_familiar")
                            .from(Alumnos::Table, Alumnos::FamilyGroupId)
                            .to(GruposFamiliares::Table, GruposFamiliares::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alumnos_apellido")
                    .table(Alumnos::Table)
                    .col(Alumnos::LastName)
                    .col(Alumnos::FirstName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alumnos_grupo_familiar")
                    .table(Alumnos::Table)
                    .col(Alumnos::FamilyGroupId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alumnos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GruposFamiliares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Personal::Table).to_owned())
            .await
    }
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
pub(super) enum Personal {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Role,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum GruposFamiliares {
    Table,
    Id,
    Name,
    ContactName,
    ContactPhone,
    ContactEmail,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
pub(super) enum Alumnos {
    Table,
    Id,
    FirstName,
    LastName,
    Document,
    BirthDate,
    Phone,
    Email,
    FamilyGroupId,
    Notes,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
