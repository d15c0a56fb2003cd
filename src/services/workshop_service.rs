//! Workshops.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    AuditAction, CurrentStaff, NewAuditEntry, NewWorkshop, Workshop, WorkshopChanges,
    WorkshopFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "workshop";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkshopService: Send + Sync {
    async fn get_workshop(&self, id: Uuid) -> AppResult<Workshop>;

    async fn list_workshops(&self, filter: WorkshopFilter) -> AppResult<Vec<Workshop>>;

    async fn create_workshop(&self, actor: &CurrentStaff, data: NewWorkshop) -> AppResult<Workshop>;

    async fn update_workshop(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: WorkshopChanges,
    ) -> AppResult<Workshop>;

    async fn delete_workshop(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;
}

pub struct WorkshopManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> WorkshopManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    /// A workshop is led by an enabled teacher or coordinator.
    async fn ensure_can_teach(&self, teacher_id: Option<Uuid>) -> AppResult<()> {
        let Some(teacher_id) = teacher_id else {
            return Ok(());
        };
        match self.uow.staff().find_by_id(teacher_id).await? {
            Some(staff) if staff.is_enabled() && staff.role.can_teach() => Ok(()),
            Some(_) => Err(AppError::validation(
                "The assigned teacher must be an active teacher or coordinator",
            )),
            None => Err(AppError::validation("The assigned teacher does not exist")),
        }
    }
}

fn check_dates(starts_on: chrono::NaiveDate, ends_on: Option<chrono::NaiveDate>) -> AppResult<()> {
    match ends_on {
        Some(end) if end < starts_on => Err(AppError::validation(
            "End date must not be before the start date",
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> WorkshopService for WorkshopManager<U> {
    async fn get_workshop(&self, id: Uuid) -> AppResult<Workshop> {
        self.uow.workshops().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_workshops(&self, filter: WorkshopFilter) -> AppResult<Vec<Workshop>> {
        self.uow.workshops().list(filter).await
    }

    async fn create_workshop(&self, actor: &CurrentStaff, mut data: NewWorkshop) -> AppResult<Workshop> {
        actor.require_records()?;

        data.schedule = data.schedule.normalized()?;
        check_dates(data.starts_on, data.ends_on)?;
        self.ensure_can_teach(data.teacher_id).await?;

        let workshop = self.uow.workshops().create(data).await?;
        tracing::info!(workshop_id = %workshop.id, name = %workshop.name, "Workshop created");

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, workshop.id)
                .with_details(&workshop),
        )
        .await;
        Ok(workshop)
    }

    async fn update_workshop(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        mut changes: WorkshopChanges,
    ) -> AppResult<Workshop> {
        actor.require_records()?;

        let current = self.get_workshop(id).await?;
        if let Some(schedule) = changes.schedule.take() {
            changes.schedule = Some(schedule.normalized()?);
        }
        check_dates(
            changes.starts_on.unwrap_or(current.starts_on),
            changes.ends_on.or(current.ends_on),
        )?;
        if !changes.clear_teacher {
            self.ensure_can_teach(changes.teacher_id).await?;
        }

        let workshop = self.uow.workshops().update(id, changes).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, id).with_details(&workshop),
        )
        .await;
        Ok(workshop)
    }

    async fn delete_workshop(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        actor.require_records()?;

        self.get_workshop(id).await?;

        let today = self.clock.today();
        let closed = self.uow.enrollments().close_all_for_workshop(id, today).await?;
        self.uow.workshops().delete(id).await?;
        tracing::info!(workshop_id = %id, closed_enrollments = closed, "Workshop deleted");

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id)
                .with_details(&serde_json::json!({ "closed_enrollments": closed })),
        )
        .await;
        Ok(())
    }
}
