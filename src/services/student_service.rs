//! Students.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    AuditAction, CurrentStaff, NewAuditEntry, NewStudent, Student, StudentChanges, StudentFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "student";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StudentService: Send + Sync {
    async fn get_student(&self, id: Uuid) -> AppResult<Student>;

    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Student>>;

    async fn create_student(&self, actor: &CurrentStaff, data: NewStudent) -> AppResult<Student>;

    async fn update_student(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: StudentChanges,
    ) -> AppResult<Student>;

    /// Soft delete; open enrollments are closed as of today
    async fn delete_student(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()>;

    async fn restore_student(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<Student>;
}

pub struct StudentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> StudentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    async fn ensure_family_exists(&self, family_group_id: Option<Uuid>) -> AppResult<()> {
        if let Some(family_id) = family_group_id {
            if self.uow.families().find_by_id(family_id).await?.is_none() {
                return Err(AppError::validation("Family group does not exist"));
            }
        }
        Ok(())
    }

    /// Documents stay unique across deleted students too.
    async fn ensure_document_free(&self, document: Option<&str>, owner: Option<Uuid>) -> AppResult<()> {
        let Some(document) = document else {
            return Ok(());
        };
        match self.uow.students().find_by_document_with_deleted(document).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::conflict(
                "A student with this document already exists",
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> StudentService for StudentManager<U> {
    async fn get_student(&self, id: Uuid) -> AppResult<Student> {
        self.uow.students().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Student>> {
        let (students, total) = self.uow.students().list(filter, page).await?;
        Ok(Paginated::new(students, &page, total))
    }

    async fn create_student(&self, actor: &CurrentStaff, data: NewStudent) -> AppResult<Student> {
        actor.require_records()?;

        self.ensure_family_exists(data.family_group_id).await?;
        self.ensure_document_free(data.document.as_deref(), None).await?;

        let student = self.uow.students().create(data).await?;
        tracing::info!(student_id = %student.id, "Student created");

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Create, ENTITY, student.id)
                .with_details(&student),
        )
        .await;
        Ok(student)
    }

    async fn update_student(
        &self,
        actor: &CurrentStaff,
        id: Uuid,
        changes: StudentChanges,
    ) -> AppResult<Student> {
        actor.require_records()?;

        if !changes.clear_family {
            self.ensure_family_exists(changes.family_group_id).await?;
        }
        self.ensure_document_free(changes.document.as_deref(), Some(id))
            .await?;

        let student = self.uow.students().update(id, changes).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, id).with_details(&student),
        )
        .await;
        Ok(student)
    }

    async fn delete_student(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<()> {
        actor.require_records()?;

        self.uow.students().find_by_id(id).await?.ok_or_not_found()?;

        let today = self.clock.today();
        let closed = self.uow.enrollments().close_all_for_student(id, today).await?;
        self.uow.students().delete(id).await?;
        tracing::info!(student_id = %id, closed_enrollments = closed, "Student deleted");

        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Delete, ENTITY, id)
                .with_details(&serde_json::json!({ "closed_enrollments": closed })),
        )
        .await;
        Ok(())
    }

    async fn restore_student(&self, actor: &CurrentStaff, id: Uuid) -> AppResult<Student> {
        actor.require_records()?;

        let student = self.uow.students().restore(id).await?;
        record(&*self.uow, NewAuditEntry::new(actor.id, AuditAction::Restore, ENTITY, id)).await;
        Ok(student)
    }
}
