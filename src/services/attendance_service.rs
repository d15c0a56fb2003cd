//! Attendance taking.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    Attendance, AttendanceChanges, AttendanceFilter, AuditAction, ClassAttendance, CurrentStaff,
    NewAuditEntry, StaffRole, Workshop,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "attendance";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceService: Send + Sync {
    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<Attendance>>;

    /// Record (or overwrite) the attendance sheet of one class
    async fn record_class(
        &self,
        actor: &CurrentStaff,
        sheet: ClassAttendance,
    ) -> AppResult<Vec<Attendance>>;

    async fn update_record(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: AttendanceChanges,
    ) -> AppResult<Attendance>;

    async fn delete_record(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;
}

pub struct AttendanceManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> AttendanceManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    /// Teachers only take attendance for the workshops they teach.
    async fn workshop_for(&self, actor: &CurrentStaff, workshop_id: Uuid) -> AppResult<Workshop> {
        let workshop = self
            .uow
            .workshops()
            .find_by_id(workshop_id)
            .await?
            .ok_or_not_found()?;

        if actor.role == StaffRole::Teacher && !workshop.is_taught_by(actor.id) {
            return Err(AppError::Forbidden);
        }
        Ok(workshop)
    }

    async fn record_for(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<Attendance> {
        let existing = self.uow.attendance().find_by_id(id).await?.ok_or_not_found()?;
        self.workshop_for(actor, existing.workshop_id).await?;
        Ok(existing)
    }

    fn check_class_date(&self, workshop: &Workshop, sheet: &ClassAttendance) -> AppResult<()> {
        let date = sheet.class_date;
        if date > self.clock.today() {
            return Err(AppError::validation("Cannot record attendance for a future class"));
        }
        if date < workshop.starts_on || workshop.ends_on.is_some_and(|end| date > end) {
            return Err(AppError::validation("The workshop does not run on that date"));
        }
        if !workshop.schedule.includes(date) {
            return Err(AppError::validation(format!(
                "{} is not a class day of this workshop",
                date
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> AttendanceService for AttendanceManager<U> {
    async fn list(&self, filter: AttendanceFilter) -> AppResult<Vec<Attendance>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::validation("'from' must not be after 'to'"));
            }
        }
        self.uow.attendance().list(filter).await
    }

    async fn record_class(
        &self,
        actor: &CurrentStaff,
        sheet: ClassAttendance,
    ) -> AppResult<Vec<Attendance>> {
        let workshop = self.workshop_for(actor, sheet.workshop_id).await?;
        self.check_class_date(&workshop, &sheet)?;

        let mut seen = HashSet::with_capacity(sheet.records.len());
        if let Some(dup) = sheet.records.iter().find(|m| !seen.insert(m.student_id)) {
            return Err(AppError::validation(format!(
                "Student {} appears more than once",
                dup.student_id
            )));
        }

        let enrollments: HashMap<Uuid, _> = self
            .uow
            .enrollments()
            .list_by_workshop(workshop.id, false)
            .await?
            .into_iter()
            .filter(|e| e.covers(sheet.class_date))
            .map(|e| (e.student_id, e))
            .collect();
        if let Some(stray) = sheet
            .records
            .iter()
            .find(|m| !enrollments.contains_key(&m.student_id))
        {
            return Err(AppError::validation(format!(
                "Student {} is not enrolled in this workshop on {}",
                stray.student_id, sheet.class_date
            )));
        }

        let ClassAttendance {
            workshop_id,
            class_date,
            records,
        } = sheet;
        let actor_id = actor.id;
        let marks = records.len();

        let saved = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let saved = ctx
                        .attendance()
                        .upsert_class(workshop_id, class_date, records, actor_id)
                        .await?;
                    ctx.audit()
                        .record(
                            NewAuditEntry::new(actor_id, AuditAction::Create, ENTITY, workshop_id)
                                .with_details(&serde_json::json!({
                                    "class_date": class_date,
                                    "records": &saved,
                                })),
                        )
                        .await?;
                    Ok(saved)
                })
            })
            .await?;

        tracing::info!(%workshop_id, %class_date, marks, "Class attendance recorded");
        Ok(saved)
    }

    async fn update_record(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: AttendanceChanges,
    ) -> AppResult<Attendance> {
        if changes.clear_notes && changes.notes.is_some() {
            return Err(AppError::validation("Notes cannot be set and cleared at once"));
        }
        self.record_for(actor, id).await?;

        let updated = self.uow.attendance().update(id, changes, actor.id).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, id).with_details(&updated),
        )
        .await;
        Ok(updated)
    }

    async fn delete_record(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        let existing = self.record_for(actor, id).await?;

        self.uow.attendance().delete(id).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id).with_details(&existing),
        )
        .await;
        Ok(())
    }
}
