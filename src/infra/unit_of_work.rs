//! Unit of Work pattern implementation.
//!
//! Hands out one repository per aggregate and runs closures inside a
//! database transaction. Operations that write several rows (a class
//! attendance sheet, an enrollment under a capacity check) go through
//! [`UnitOfWork::transaction`] so their audit entry commits with them.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::tx;
use super::repositories::{
    AttendanceRepository, AttendanceStore, AuditRepository, AuditStore, EnrollmentRepository,
    EnrollmentStore, FamilyRepository, FamilyStore, PaymentRepository, PaymentStore,
    PricingRepository, PricingStore, StaffRepository, StaffStore, StudentRepository, StudentStore,
    WorkshopRepository, WorkshopStore,
};
use crate::domain::{Attendance, AttendanceMark, Enrollment, NewAuditEntry};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods;
/// tests implement it over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn staff(&self) -> Arc<dyn StaffRepository>;

    fn families(&self) -> Arc<dyn FamilyRepository>;

    fn students(&self) -> Arc<dyn StudentRepository>;

    fn workshops(&self) -> Arc<dyn WorkshopRepository>;

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository>;

    fn attendance(&self) -> Arc<dyn AttendanceRepository>;

    fn pricing(&self) -> Arc<dyn PricingRepository>;

    fn payments(&self) -> Arc<dyn PaymentRepository>;

    fn audit(&self) -> Arc<dyn AuditRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// Committed on success, rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a Serializable transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn attendance(&self) -> TxAttendanceRepository<'_> {
        TxAttendanceRepository { txn: self.txn }
    }

    pub fn enrollments(&self) -> TxEnrollmentRepository<'_> {
        TxEnrollmentRepository { txn: self.txn }
    }

    pub fn audit(&self) -> TxAuditRepository<'_> {
        TxAuditRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    staff_repo: Arc<StaffStore>,
    family_repo: Arc<FamilyStore>,
    student_repo: Arc<StudentStore>,
    workshop_repo: Arc<WorkshopStore>,
    enrollment_repo: Arc<EnrollmentStore>,
    attendance_repo: Arc<AttendanceStore>,
    pricing_repo: Arc<PricingStore>,
    payment_repo: Arc<PaymentStore>,
    audit_repo: Arc<AuditStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            staff_repo: Arc::new(StaffStore::new(db.clone())),
            family_repo: Arc::new(FamilyStore::new(db.clone())),
            student_repo: Arc::new(StudentStore::new(db.clone())),
            workshop_repo: Arc::new(WorkshopStore::new(db.clone())),
            enrollment_repo: Arc::new(EnrollmentStore::new(db.clone())),
            attendance_repo: Arc::new(AttendanceStore::new(db.clone())),
            pricing_repo: Arc::new(PricingStore::new(db.clone())),
            payment_repo: Arc::new(PaymentStore::new(db.clone())),
            audit_repo: Arc::new(AuditStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        // Serialization failures may surface on any statement or on commit
        match f(ctx).await {
            Ok(result) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::from(e).for_transaction())?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e.for_transaction())
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn staff(&self) -> Arc<dyn StaffRepository> {
        self.staff_repo.clone()
    }

    fn families(&self) -> Arc<dyn FamilyRepository> {
        self.family_repo.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.student_repo.clone()
    }

    fn workshops(&self) -> Arc<dyn WorkshopRepository> {
        self.workshop_repo.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollment_repo.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceRepository> {
        self.attendance_repo.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingRepository> {
        self.pricing_repo.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repo.clone()
    }

    fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Attendance writes inside a transaction
pub struct TxAttendanceRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAttendanceRepository<'a> {
    /// Insert or overwrite the marks of one class
    pub async fn upsert_class(
        &self,
        workshop_id: Uuid,
        class_date: NaiveDate,
        marks: Vec<AttendanceMark>,
        recorded_by: Uuid,
    ) -> AppResult<Vec<Attendance>> {
        tx::upsert_class(self.txn, workshop_id, class_date, marks, recorded_by).await
    }
}

/// Enrollment reads and writes inside a transaction
pub struct TxEnrollmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxEnrollmentRepository<'a> {
    pub async fn find_open(&self, student_id: Uuid, workshop_id: Uuid) -> AppResult<Option<Enrollment>> {
        tx::find_open(self.txn, student_id, workshop_id).await
    }

    /// Open enrollments of a workshop
    pub async fn count_open(&self, workshop_id: Uuid) -> AppResult<u64> {
        tx::count_open(self.txn, workshop_id).await
    }

    pub async fn create(
        &self,
        student_id: Uuid,
        workshop_id: Uuid,
        enrolled_on: NaiveDate,
    ) -> AppResult<Enrollment> {
        tx::insert_enrollment(self.txn, student_id, workshop_id, enrolled_on).await
    }
}

/// Audit log writes inside a transaction
pub struct TxAuditRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAuditRepository<'a> {
    pub async fn record(&self, entry: NewAuditEntry) -> AppResult<()> {
        tx::record_audit(self.txn, entry).await
    }
}
