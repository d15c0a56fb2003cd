//! Enrollments of students into workshops.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::audit_service::record;
use crate::domain::{
    check_admission, AuditAction, CurrentStaff, Enrollment, NewAuditEntry, NewEnrollment,
    Withdrawal,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ENTITY: &str = "enrollment";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    async fn list_for_workshop(&self, workshop_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>>;

    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// Enroll under the workshop's capacity, serializably
    async fn enroll(
        &self,
        actor: &CurrentStaff,
        workshop_id: Uuid,
        data: NewEnrollment,
    ) -> AppResult<Enrollment>;

    /// Close the student's open enrollment in the workshop
    async fn withdraw(
        &self,
        actor: &CurrentStaff,
        workshop_id: Uuid,
        student_id: Uuid,
        data: Withdrawal,
    ) -> AppResult<Enrollment>;
}

pub struct EnrollmentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> EnrollmentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentManager<U> {
    async fn list_for_workshop(&self, workshop_id: Uuid, open_only: bool) -> AppResult<Vec<Enrollment>> {
        self.uow.workshops().find_by_id(workshop_id).await?.ok_or_not_found()?;
        self.uow.enrollments().list_by_workshop(workshop_id, open_only).await
    }

    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>> {
        self.uow.students().find_by_id(student_id).await?.ok_or_not_found()?;
        self.uow.enrollments().list_by_student(student_id, false).await
    }

    async fn enroll(
        &self,
        actor: &CurrentStaff,
        workshop_id: Uuid,
        data: NewEnrollment,
    ) -> AppResult<Enrollment> {
        actor.require_records()?;

        let workshop = self.uow.workshops().find_by_id(workshop_id).await?.ok_or_not_found()?;
        if !workshop.is_enabled() {
            return Err(AppError::validation("Workshop is not active"));
        }
        let student = self
            .uow
            .students()
            .find_by_id(data.student_id)
            .await?
            .ok_or_else(|| AppError::validation("Student does not exist"))?;
        if !student.is_enabled() {
            return Err(AppError::validation("Student is not active"));
        }

        let enrolled_on = data.enrolled_on.unwrap_or_else(|| self.clock.today());
        if workshop.ends_on.is_some_and(|end| enrolled_on > end) {
            return Err(AppError::validation("Workshop has already ended on that date"));
        }

        let (student_id, capacity, actor_id) = (student.id, workshop.capacity, actor.id);
        let enrollment = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let enrollments = ctx.enrollments();
                    let already_open = enrollments.find_open(student_id, workshop_id).await?.is_some();
                    let taken = match capacity {
                        Some(_) if !already_open => enrollments.count_open(workshop_id).await?,
                        _ => 0,
                    };
                    check_admission(already_open, taken, capacity)?;

                    let enrollment = enrollments.create(student_id, workshop_id, enrolled_on).await?;
                    ctx.audit()
                        .record(
                            NewAuditEntry::new(actor_id, AuditAction::Create, ENTITY, enrollment.id)
                                .with_details(&enrollment),
                        )
                        .await?;
                    Ok(enrollment)
                })
            })
            .await?;

        tracing::info!(%student_id, %workshop_id, "Student enrolled");
        Ok(enrollment)
    }

    async fn withdraw(
        &self,
        actor: &CurrentStaff,
        workshop_id: Uuid,
        student_id: Uuid,
        data: Withdrawal,
    ) -> AppResult<Enrollment> {
        actor.require_records()?;

        let open = self
            .uow
            .enrollments()
            .find_open(student_id, workshop_id)
            .await?
            .ok_or_not_found()?;

        let left_on = data.left_on.unwrap_or_else(|| self.clock.today());
        if left_on < open.enrolled_on {
            return Err(AppError::validation(
                "Withdrawal date must not be before the enrollment date",
            ));
        }

        let enrollment = self.uow.enrollments().withdraw(open.id, left_on).await?;
        record(
            &*self.uow,
            NewAuditEntry::new(actor.id, AuditAction::Update, ENTITY, enrollment.id)
                .with_details(&enrollment),
        )
        .await;
        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StaffRole;
    use crate::infra::repositories::entities::{audit_entry, enrollment, student, workshop};
    use crate::infra::{FixedClock, Persistence};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn coordinator() -> CurrentStaff {
        CurrentStaff {
            id: Uuid::new_v4(),
            role: StaffRole::Coordinator,
        }
    }

    fn workshop_row(id: Uuid, capacity: Option<i32>) -> workshop::Model {
        workshop::Model {
            id,
            name: "Clown".to_string(),
            description: None,
            teacher_id: None,
            weekdays: "1,4".to_string(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            capacity,
            starts_on: day(2),
            ends_on: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn student_row(id: Uuid) -> student::Model {
        student::Model {
            id,
            first_name: "Julieta".to_string(),
            last_name: "Paz".to_string(),
            document: None,
            birth_date: None,
            phone: None,
            email: None,
            family_group_id: None,
            notes: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn enrollment_row(student_id: Uuid, workshop_id: Uuid) -> enrollment::Model {
        enrollment::Model {
            id: Uuid::new_v4(),
            student_id,
            workshop_id,
            enrolled_on: day(16),
            left_on: None,
            created_at: Utc::now(),
        }
    }

    fn audit_row(entity_id: Uuid) -> audit_entry::Model {
        audit_entry::Model {
            id: Uuid::new_v4(),
            actor_id: None,
            action: "create".to_string(),
            entity: ENTITY.to_string(),
            entity_id: Some(entity_id),
            details: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    /// Database answering the lookups done before the transaction starts
    fn database(student_id: Uuid, workshop_id: Uuid, taken: i64) -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![workshop_row(workshop_id, Some(15))]])
            .append_query_results([vec![student_row(student_id)]])
            .append_query_results([Vec::<enrollment::Model>::new()])
            .append_query_results([vec![BTreeMap::from([("num_items", Value::BigInt(Some(taken)))])]])
    }

    fn manager(db: &DatabaseConnection) -> EnrollmentManager<Persistence> {
        EnrollmentManager::new(
            Arc::new(Persistence::new(db.clone())),
            Arc::new(FixedClock(day(16))),
        )
    }

    fn new_enrollment(student_id: Uuid) -> NewEnrollment {
        NewEnrollment {
            student_id,
            enrolled_on: None,
        }
    }

    fn transaction_log(db: DatabaseConnection) -> String {
        format!("{:?}", db.into_transaction_log())
    }

    #[tokio::test]
    async fn test_enrollment_commits_with_its_audit_entry() {
        let (student_id, workshop_id) = (Uuid::new_v4(), Uuid::new_v4());
        let created = enrollment_row(student_id, workshop_id);
        let db = database(student_id, workshop_id, 3)
            .append_query_results([vec![created.clone()]])
            .append_query_results([vec![audit_row(created.id)]])
            .into_connection();

        let enrollment = manager(&db)
            .enroll(&coordinator(), workshop_id, new_enrollment(student_id))
            .await
            .unwrap();

        assert_eq!(enrollment.id, created.id);
        assert_eq!(enrollment.enrolled_on, day(16));
        assert!(transaction_log(db).contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_failed_audit_write_undoes_the_enrollment() {
        let (student_id, workshop_id) = (Uuid::new_v4(), Uuid::new_v4());
        let created = enrollment_row(student_id, workshop_id);
        let db = database(student_id, workshop_id, 3)
            .append_query_results([vec![created]])
            .append_query_errors([DbErr::Custom("audit table unavailable".to_string())])
            .into_connection();

        let result = manager(&db)
            .enroll(&coordinator(), workshop_id, new_enrollment(student_id))
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(!transaction_log(db).contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_full_workshop_is_rejected_inside_the_transaction() {
        let (student_id, workshop_id) = (Uuid::new_v4(), Uuid::new_v4());
        let db = database(student_id, workshop_id, 15).into_connection();

        let result = manager(&db)
            .enroll(&coordinator(), workshop_id, new_enrollment(student_id))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "Workshop is full"));
        assert!(!transaction_log(db).contains("INSERT"));
    }
}
