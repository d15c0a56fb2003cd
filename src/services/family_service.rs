//! Family groups.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    AuditAction, CurrentStaff, FamilyChanges, FamilyDetails, FamilyGroup, NewAuditEntry,
    NewFamilyGroup,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "family_group";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FamilyService: Send + Sync {
    async fn list_families(&self) -> AppResult<Vec<FamilyGroup>>;

    /// Family together with its non-deleted members
    async fn get_family(&self, id: Uuid) -> AppResult<FamilyDetails>;

    async fn create_family(&self, actor: &CurrentStaff, data: NewFamilyGroup) -> AppResult<FamilyGroup>;

    async fn update_family(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: FamilyChanges,
    ) -> AppResult<FamilyGroup>;

    /// Soft delete; refused while active students belong to the family
    async fn delete_family(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;
}

pub struct FamilyManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FamilyManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FamilyService for FamilyManager<U> {
    async fn list_families(&self) -> AppResult<Vec<FamilyGroup>> {
        self.uow.families().list().await
    }

    async fn get_family(&self, id: Uuid) -> AppResult<FamilyDetails> {
        let family = self.uow.families().find_by_id(id).await?.ok_or_not_found()?;
        let members = self.uow.students().list_by_family(id).await?;
        Ok(FamilyDetails { family, members })
    }

    async fn create_family(&self, actor: &CurrentStaff, data: NewFamilyGroup) -> AppResult<FamilyGroup> {
        actor.require_records()?;

        let family = self.uow.families().create(data).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, family.id).with_details(&family),
        )
        .await;
        Ok(family)
    }

    async fn update_family(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: FamilyChanges,
    ) -> AppResult<FamilyGroup> {
        actor.require_records()?;

        let family = self.uow.families().update(id, changes).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, id).with_details(&family),
        )
        .await;
        Ok(family)
    }

    async fn delete_family(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        actor.require_records()?;

        self.uow.families().find_by_id(id).await?.ok_or_not_found()?;
        let members = self.uow.students().list_by_family(id).await?;
        let active = members.iter().filter(|s| s.is_enabled()).count();
        if active > 0 {
            return Err(AppError::conflict(format!(
                "Family still has {} active student(s)",
                active
            )));
        }

        self.uow.families().delete(id).await?;
        record(&*self.uow, NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id)).await;
        Ok(())
    }
}
