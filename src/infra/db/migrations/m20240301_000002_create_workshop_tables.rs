//! Migration: workshops, enrollments and attendance.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_people_tables::{Alumnos, Personal};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Talleres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Talleres::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Talleres::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Talleres::Description).text().null())
                    .col(ColumnDef::new(Talleres::TeacherId).uuid().null())
                    .col(ColumnDef::new(Talleres::Weekdays).string_len(20).not_null())
                    .col(ColumnDef::new(Talleres::StartTime).time().not_null())
                    .col(ColumnDef::new(Talleres::EndTime).time().not_null())
                    .col(ColumnDef::new(Talleres::Capacity).integer().null())
                    .col(ColumnDef::new(Talleres::StartsOn).date().not_null())
                    .col(ColumnDef::new(Talleres::EndsOn).date().null())
                    .col(ColumnDef::new(Talleres::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Talleres::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Talleres::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Talleres::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_talleres_docente")
                            .from(Talleres::Table, Talleres::TeacherId)
                            .to(Personal::Table, Personal::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inscripciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inscripciones::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Inscripciones::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Inscripciones::WorkshopId).uuid().not_null())
                    .col(ColumnDef::new(Inscripciones::EnrolledOn).date().not_null())
                    .col(ColumnDef::new(Inscripciones::LeftOn).date().null())
                    .col(
                        ColumnDef::new(Inscripciones::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inscripciones_alumno")
                            .from(Inscripciones::Table, Inscripciones::StudentId)
                            .to(Alumnos::Table, Alumnos::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inscripciones_taller")
                            .from(Inscripciones::Table, Inscripciones::WorkshopId)
                            .to(Talleres::Table, Talleres::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one open enrollment per student and workshop
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_inscripciones_abiertas \
                 ON inscripciones (student_id, workshop_id) WHERE left_on IS NULL",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Asistencias::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Asistencias::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Asistencias::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Asistencias::WorkshopId).uuid().not_null())
                    .col(ColumnDef::new(Asistencias::ClassDate).date().not_null())
                    .col(
                        ColumnDef::new(Asistencias::Status)
                            .string_len(16)
                            .not_null()
                            .check(
                                Expr::col(Asistencias::Status)
                                    .is_in(["present", "absent", "justified"]),
                            ),
                    )
                    .col(ColumnDef::new(Asistencias::Notes).string_len(500).null())
                    .col(ColumnDef::new(Asistencias::RecordedBy).uuid().null())
                    .col(
                        ColumnDef::new(Asistencias::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Asistencias::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencias_alumno")
                            .from(Asistencias::Table, Asistencias::StudentId)
                            .to(Alumnos::Table, Alumnos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asistencias_taller")
                            .from(Asistencias::Table, Asistencias::WorkshopId)
                            .to(Talleres::Table, Talleres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_asistencias_clase")
                    .table(Asistencias::Table)
                    .col(Asistencias::StudentId)
                    .col(Asistencias::WorkshopId)
                    .col(Asistencias::ClassDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asistencias_taller_fecha")
                    .table(Asistencias::Table)
                    .col(Asistencias::WorkshopId)
                    .col(Asistencias::ClassDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Asistencias::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inscripciones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Talleres::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Talleres {
    Table,
    Id,
    Name,
    Description,
    TeacherId,
    Weekdays,
    StartTime,
    EndTime,
    Capacity,
    StartsOn,
    EndsOn,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Inscripciones {
    Table,
    Id,
    StudentId,
    WorkshopId,
    EnrolledOn,
    LeftOn,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Asistencias {
    Table,
    Id,
    StudentId,
    WorkshopId,
    ClassDate,
    Status,
    Notes,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}
