//! Audit log (`auditoria`) entity.

use sea_orm::entity::prelude::*;

use crate::domain::{AuditAction, AuditEntry};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "auditoria")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub details: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AuditEntry {
    fn from(model: Model) -> Self {
        AuditEntry {
            id: model.id,
            actor_id: model.actor_id,
            action: AuditAction::from(model.action.as_str()),
            entity: model.entity,
            entity_id: model.entity_id,
            details: model.details,
            created_at: model.created_at,
        }
    }
}
