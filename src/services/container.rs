//! Service container plus small helpers for running independent queries
//! concurrently.

use std::future::Future;
use std::sync::Arc;

use super::{
    AttendanceManager, AttendanceService, AuditManager, AuditService, EnrollmentManager,
    EnrollmentService, FamilyManager, FamilyService, PaymentManager, PaymentService,
    PricingManager, PricingService, ReportManager, ReportService, StaffManager, StaffService,
    StudentManager, StudentService, WorkshopManager, WorkshopService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Clock, Persistence, SystemClock, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Access to every application service; handlers only see this trait.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn staff(&self) -> Arc<dyn StaffService>;

    fn families(&self) -> Arc<dyn FamilyService>;

    fn students(&self) -> Arc<dyn StudentService>;

    fn workshops(&self) -> Arc<dyn WorkshopService>;

    fn enrollments(&self) -> Arc<dyn EnrollmentService>;

    fn attendance(&self) -> Arc<dyn AttendanceService>;

    fn pricing(&self) -> Arc<dyn PricingService>;

    fn payments(&self) -> Arc<dyn PaymentService>;

    fn reports(&self) -> Arc<dyn ReportService>;

    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    staff: Arc<dyn StaffService>,
    families: Arc<dyn FamilyService>,
    students: Arc<dyn StudentService>,
    workshops: Arc<dyn WorkshopService>,
    enrollments: Arc<dyn EnrollmentService>,
    attendance: Arc<dyn AttendanceService>,
    pricing: Arc<dyn PricingService>,
    payments: Arc<dyn PaymentService>,
    reports: Arc<dyn ReportService>,
    audit: Arc<dyn AuditService>,
}

impl Services {
    /// Wire every service over one unit of work and clock.
    pub fn build<U>(uow: Arc<U>, clock: Arc<dyn Clock>, config: &Config) -> Self
    where
        U: UnitOfWork + 'static,
    {
        Self {
            staff: Arc::new(StaffManager::new(uow.clone())),
            families: Arc::new(FamilyManager::new(uow.clone())),
            students: Arc::new(StudentManager::new(uow.clone(), clock.clone())),
            workshops: Arc::new(WorkshopManager::new(uow.clone(), clock.clone())),
            enrollments: Arc::new(EnrollmentManager::new(uow.clone(), clock.clone())),
            attendance: Arc::new(AttendanceManager::new(uow.clone(), clock.clone())),
            pricing: Arc::new(PricingManager::new(uow.clone(), config.sibling_discount_percent)),
            payments: Arc::new(PaymentManager::new(uow.clone(), clock.clone())),
            reports: Arc::new(ReportManager::new(uow.clone(), clock, config.into())),
            audit: Arc::new(AuditManager::new(uow)),
        }
    }

    /// Production wiring: database-backed unit of work and the system clock
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        Self::build(Arc::new(Persistence::new(db)), Arc::new(SystemClock), config)
    }
}

impl ServiceContainer for Services {
    fn staff(&self) -> Arc<dyn StaffService> {
        self.staff.clone()
    }

    fn families(&self) -> Arc<dyn FamilyService> {
        self.families.clone()
    }

    fn students(&self) -> Arc<dyn StudentService> {
        self.students.clone()
    }

    fn workshops(&self) -> Arc<dyn WorkshopService> {
        self.workshops.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollments.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceService> {
        self.attendance.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingService> {
        self.pricing.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payments.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.reports.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit.clone()
    }
}

/// Concurrent execution of independent fallible operations.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Run two operations concurrently; the first error wins.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Run at most `limit` operations at a time.
    ///
    /// Results come back in completion order, not input order.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .map(Ok)
            .try_buffer_unordered(limit.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join3_fails_fast() {
        let result = parallel::join3(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::NotFound) },
            async { Ok::<_, AppError>(3) },
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_join_all_limited_collects_everything() {
        let futures = (0..10).map(|i| async move { Ok::<_, AppError>(i) });
        let mut results = parallel::join_all_limited(futures, 3).await.unwrap();
        results.sort();
        assert_eq!(results, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_join_all_limited_zero_limit_still_runs() {
        let futures = (0..2).map(|i| async move { Ok::<_, AppError>(i) });
        assert_eq!(parallel::join_all_limited(futures, 0).await.unwrap().len(), 2);
    }
}
