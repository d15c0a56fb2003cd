//! Shared fixtures: a unit of work over mocked repositories and
//! builders for domain records.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use alumni::domain::{
    Attendance, AttendanceStatus, CurrentStaff, Enrollment, StaffRole, Student, WeeklySchedule,
    Workshop,
};
use alumni::errors::{AppError, AppResult};
use alumni::infra::repositories::{
    MockAttendanceRepository, MockAuditRepository, MockEnrollmentRepository,
    MockFamilyRepository, MockPaymentRepository, MockPricingRepository, MockStaffRepository,
    MockStudentRepository, MockWorkshopRepository,
};
use alumni::infra::{
    AttendanceRepository, AuditRepository, EnrollmentRepository, FamilyRepository,
    PaymentRepository, PricingRepository, StaffRepository, StudentRepository, TransactionContext,
    TxFuture, UnitOfWork, WorkshopRepository,
};

/// Unit of work over mocks. Repositories left unset are mocks without
/// expectations, so any call to them fails the test.
pub struct TestUnitOfWork {
    pub staff: Arc<MockStaffRepository>,
    pub families: Arc<MockFamilyRepository>,
    pub students: Arc<MockStudentRepository>,
    pub workshops: Arc<MockWorkshopRepository>,
    pub enrollments: Arc<MockEnrollmentRepository>,
    pub attendance: Arc<MockAttendanceRepository>,
    pub pricing: Arc<MockPricingRepository>,
    pub payments: Arc<MockPaymentRepository>,
    pub audit: Arc<MockAuditRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            staff: Arc::new(MockStaffRepository::new()),
            families: Arc::new(MockFamilyRepository::new()),
            students: Arc::new(MockStudentRepository::new()),
            workshops: Arc::new(MockWorkshopRepository::new()),
            enrollments: Arc::new(MockEnrollmentRepository::new()),
            attendance: Arc::new(MockAttendanceRepository::new()),
            pricing: Arc::new(MockPricingRepository::new()),
            payments: Arc::new(MockPaymentRepository::new()),
            audit: Arc::new(MockAuditRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_staff(mut self, repo: MockStaffRepository) -> Self {
        self.staff = Arc::new(repo);
        self
    }

    pub fn with_families(mut self, repo: MockFamilyRepository) -> Self {
        self.families = Arc::new(repo);
        self
    }

    pub fn with_students(mut self, repo: MockStudentRepository) -> Self {
        self.students = Arc::new(repo);
        self
    }

    pub fn with_workshops(mut self, repo: MockWorkshopRepository) -> Self {
        self.workshops = Arc::new(repo);
        self
    }

    pub fn with_enrollments(mut self, repo: MockEnrollmentRepository) -> Self {
        self.enrollments = Arc::new(repo);
        self
    }

    pub fn with_attendance(mut self, repo: MockAttendanceRepository) -> Self {
        self.attendance = Arc::new(repo);
        self
    }

    pub fn with_pricing(mut self, repo: MockPricingRepository) -> Self {
        self.pricing = Arc::new(repo);
        self
    }

    pub fn with_payments(mut self, repo: MockPaymentRepository) -> Self {
        self.payments = Arc::new(repo);
        self
    }

    /// Accept any number of audit writes
    pub fn with_audit_sink(mut self) -> Self {
        let mut audit = MockAuditRepository::new();
        audit.expect_record().returning(|_| Ok(()));
        self.audit = Arc::new(audit);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff.clone()
    }

    fn families(&self) -> Arc<dyn FamilyRepository> {
        self.families.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.students.clone()
    }

    fn workshops(&self) -> Arc<dyn WorkshopRepository> {
        self.workshops.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollments.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceRepository> {
        self.attendance.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingRepository> {
        self.pricing.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal(TX_UNSUPPORTED))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal(TX_UNSUPPORTED))
    }
}

pub const TX_UNSUPPORTED: &str = "Transactions not supported in test mock";

/// Validation passed and the service reached its transaction
pub fn reached_transaction<T: std::fmt::Debug>(result: AppResult<T>) -> bool {
    matches!(result, Err(AppError::Internal(msg)) if msg == TX_UNSUPPORTED)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn actor(role: StaffRole) -> CurrentStaff {
    CurrentStaff {
        id: Uuid::new_v4(),
        role,
    }
}

pub fn student(id: Uuid) -> Student {
    Student {
        id,
        first_name: "Lucía".to_string(),
        last_name: "Ferreyra".to_string(),
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

/// Monday and Thursday workshop running since 2024-03-04
pub fn workshop(id: Uuid, teacher_id: Option<Uuid>) -> Workshop {
    Workshop {
        id,
        name: "Teatro adolescentes".to_string(),
        description: None,
        teacher_id,
        schedule: WeeklySchedule::new(
            vec![Weekday::Mon, Weekday::Thu],
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        )
        .unwrap(),
        capacity: Some(15),
        starts_on: date(2024, 3, 4),
        ends_on: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

pub fn enrollment(student_id: Uuid, workshop_id: Uuid, enrolled_on: NaiveDate) -> Enrollment {
    Enrollment {
        id: Uuid::new_v4(),
        student_id,
        workshop_id,
        enrolled_on,
        left_on: None,
        created_at: Utc::now(),
    }
}

pub fn attendance(
    student_id: Uuid,
    workshop_id: Uuid,
    class_date: NaiveDate,
    status: AttendanceStatus,
) -> Attendance {
    Attendance {
        id: Uuid::new_v4(),
        student_id,
        workshop_id,
        class_date,
        status,
        notes: None,
        recorded_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
