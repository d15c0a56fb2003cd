//! Enrollment (`inscripciones`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::Enrollment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inscripciones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub workshop_id: Uuid,
    pub enrolled_on: Date,
    pub left_on: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Enrollment {
    fn from(model: Model) -> Self {
        Enrollment {
            id: model.id,
            student_id: model.student_id,
            workshop_id: model.workshop_id,
            enrolled_on: model.enrolled_on,
            left_on: model.left_on,
            created_at: model.created_at,
        }
    }
}
