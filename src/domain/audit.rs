//! Audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Restore,
    Void,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Restore => "restore",
            AuditAction::Void => "void",
        }
    }
}

impl From<&str> for AuditAction {
    fn from(s: &str) -> Self {
        match s {
            "create" => AuditAction::Create,
            "delete" => AuditAction::Delete,
            "restore" => AuditAction::Restore,
            "void" => AuditAction::Void,
            _ => AuditAction::Update,
        }
    }
}

/// Stored audit entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    /// Table-like name of the affected resource, e.g. "student"
    pub entity: String,
    pub entity_id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Audit entry to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity: &'static str,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
}

impl NewAuditEntry {
    pub fn new(actor_id: Uuid, action: AuditAction, entity: &'static str, entity_id: Uuid) -> Self {
        Self {
            actor_id: Some(actor_id),
            action,
            entity,
            entity_id: Some(entity_id),
            details: serde_json::Value::Null,
        }
    }

    /// Attach a snapshot of the request or the resulting record.
    pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
        self.details = serde_json::to_value(details).unwrap_or(serde_json::Value::Null);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditFilter {
    pub entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub actor_id: Option<Uuid>,
}
