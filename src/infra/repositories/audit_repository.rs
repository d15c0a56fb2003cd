//! Audit log repository. Entries are append-only.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::audit_entry::{self, ActiveModel, Entity as AuditEntity};
use super::page::fetch_page;
use crate::domain::{AuditEntry, AuditFilter, NewAuditEntry};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> AppResult<()>;

    /// Newest first
    async fn list(
        &self,
        filter: AuditFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<AuditEntry>, u64)>;
}

pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn record<C: ConnectionTrait>(db: &C, entry: NewAuditEntry) -> AppResult<()> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        actor_id: Set(entry.actor_id),
        action: Set(entry.action.as_str().to_string()),
        entity: Set(entry.entity.to_string()),
        entity_id: Set(entry.entity_id),
        details: Set(entry.details),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(())
}

#[async_trait]
impl AuditRepository for AuditStore {
    async fn record(&self, entry: NewAuditEntry) -> AppResult<()> {
        record(&self.db, entry).await
    }

    async fn list(
        &self,
        filter: AuditFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<AuditEntry>, u64)> {
        let mut query = AuditEntity::find();
        if let Some(entity) = filter.entity {
            query = query.filter(audit_entry::Column::Entity.eq(entity));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(audit_entry::Column::EntityId.eq(entity_id));
        }
        if let Some(actor_id) = filter.actor_id {
            query = query.filter(audit_entry::Column::ActorId.eq(actor_id));
        }

        let query = query.order_by_desc(audit_entry::Column::CreatedAt);
        let (models, total) = fetch_page(&self.db, query, &page).await?;
        Ok((models.into_iter().map(AuditEntry::from).collect(), total))
    }
}
