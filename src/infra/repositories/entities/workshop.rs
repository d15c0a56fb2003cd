//! Workshop (`talleres`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::{WeeklySchedule, Workshop};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "talleres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
    /// Comma separated ISO weekdays, e.g. "1,4"
    pub weekdays: String,
    pub start_time: Time,
    pub end_time: Time,
    pub capacity: Option<i32>,
    pub starts_on: Date,
    pub ends_on: Option<Date>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fails only if the stored schedule was corrupted outside the application.
impl TryFrom<Model> for Workshop {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let schedule = WeeklySchedule::from_stored(&model.weekdays, model.start_time, model.end_time)
            .map_err(|e| {
                AppError::internal(format!("Workshop {} has an invalid schedule: {}", model.id, e))
            })?;

        Ok(Workshop {
            id: model.id,
            name: model.name,
            description: model.description,
            teacher_id: model.teacher_id,
            schedule,
            capacity: model.capacity,
            starts_on: model.starts_on,
            ends_on: model.ends_on,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
