//! Staff management and request identity.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{AuditAction, CurrentStaff, NewAuditEntry, NewStaff, Staff, StaffChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "staff";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffService: Send + Sync {
    /// Resolve the acting staff member; unknown or disabled ids are rejected
    async fn identify(&self, id: Uuid) -> AppResult<CurrentStaff>;

    async fn get_staff(&self, id: Uuid) -> AppResult<Staff>;

    async fn list_staff(&self, include_inactive: bool) -> AppResult<Vec<Staff>>;

    async fn create_staff(&self, actor: &CurrentStaff, data: NewStaff) -> AppResult<Staff>;

    async fn update_staff(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: StaffChanges,
    ) -> AppResult<Staff>;

    /// Soft delete
    async fn delete_staff(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;

    async fn restore_staff(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<Staff>;
}

pub struct StaffManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StaffManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StaffService for StaffManager<U> {
    async fn identify(&self, id: Uuid) -> AppResult<CurrentStaff> {
        match self.uow.staff().find_by_id(id).await? {
            Some(staff) if staff.is_enabled() => Ok(CurrentStaff::from(&staff)),
            _ => {
                tracing::debug!(%id, "Rejected unknown or disabled staff id");
                Err(AppError::Unauthorized)
            }
        }
    }

    async fn get_staff(&self, id: Uuid) -> AppResult<Staff> {
        self.uow.staff().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_staff(&self, include_inactive: bool) -> AppResult<Vec<Staff>> {
        self.uow.staff().list(include_inactive).await
    }

    async fn create_staff(&self, actor: &CurrentStaff, data: NewStaff) -> AppResult<Staff> {
        actor.require_admin()?;

        if self
            .uow
            .staff()
            .find_by_email_with_deleted(&data.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("A staff member with this email already exists"));
        }

        let staff = self.uow.staff().create(data).await?;
        tracing::info!(staff_id = %staff.id, role = %staff.role, "Staff member created");

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, staff.id).with_details(&staff),
        )
        .await;
        Ok(staff)
    }

    async fn update_staff(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: StaffChanges,
    ) -> AppResult<Staff> {
        actor.require_admin()?;

        if id == actor.id {
            if changes.active == Some(false) {
                return Err(AppError::validation("You cannot deactivate your own account"));
            }
            if changes.role.is_some_and(|role| !role.is_admin()) {
                return Err(AppError::validation("You cannot remove your own admin role"));
            }
        }

        let staff = self.uow.staff().update(id, changes).await?;

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, id).with_details(&staff),
        )
        .await;
        Ok(staff)
    }

    async fn delete_staff(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        if id == actor.id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        self.uow.staff().delete(id).await?;
        tracing::info!(staff_id = %id, "Staff member deleted");

        record(&*self.uow, NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id)).await;
        Ok(())
    }

    async fn restore_staff(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<Staff> {
        actor.require_admin()?;

        let staff = self.uow.staff().restore(id).await?;

        record(&*self.uow, NewAuditEntry::new(actor.id, AuditAction::Restore, ENTITY, id)).await;
        Ok(staff)
    }
}
