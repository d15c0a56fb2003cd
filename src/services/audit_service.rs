//! Audit log reads and the shared write helper.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AuditEntry, AuditFilter, CurrentStaff, NewAuditEntry};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Newest first; admin only
    async fn list_entries(
        &self,
        actor: &CurrentStaff,
        filter: AuditFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<AuditEntry>>;
}

pub struct AuditManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AuditManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuditService for AuditManager<U> {
    async fn list_entries(
        &self,
        actor: &CurrentStaff,
        filter: AuditFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<AuditEntry>> {
        actor.require_admin()?;
        let (entries, total) = self.uow.audit().list(filter, page).await?;
        Ok(Paginated::new(entries, &page, total))
    }
}

/// Record an entry for a write that already happened.
///
/// A failure here is logged rather than returned: the write itself stands.
pub(crate) async fn record<U: UnitOfWork>(uow: &U, entry: NewAuditEntry) {
    let (entity, action) = (entry.entity, entry.action);
    if let Err(e) = uow.audit().record(entry).await {
        tracing::error!(entity, action = action.as_str(), error = %e, "Failed to write audit entry");
    }
}
