//! Attendance (`asistencias`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Attendance, AttendanceStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "asistencias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub workshop_id: Uuid,
    pub class_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Attendance {
    fn from(model: Model) -> Self {
        // The column has a CHECK constraint; anything else is read as absent.
        let status = model
            .status
            .parse()
            .unwrap_or(AttendanceStatus::Absent);

        Attendance {
            id: model.id,
            student_id: model.student_id,
            workshop_id: model.workshop_id,
            class_date: model.class_date,
            status,
            notes: model.notes,
            recorded_by: model.recorded_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
