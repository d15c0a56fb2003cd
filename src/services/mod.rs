//! Application services layer - Use cases and business logic.
//!
//! One service per aggregate, each a trait plus a `*Manager` generic
//! over the [`UnitOfWork`](crate::infra::UnitOfWork). Permission checks
//! and audit entries live here, so handlers stay thin.

mod attendance_service;
mod audit_service;
pub mod container;
mod enrollment_service;
mod family_service;
mod payment_service;
mod pricing_service;
mod report_service;
mod staff_service;
mod student_service;
mod workshop_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use attendance_service::{AttendanceManager, AttendanceService};
pub use audit_service::{AuditManager, AuditService};
pub use enrollment_service::{EnrollmentManager, EnrollmentService};
pub use family_service::{FamilyManager, FamilyService};
pub use payment_service::{PaymentManager, PaymentService};
pub use pricing_service::{PricingManager, PricingService};
pub use report_service::{ReportManager, ReportService, ReportSettings};
pub use staff_service::{StaffManager, StaffService};
pub use student_service::{StudentManager, StudentService};
pub use workshop_service::{WorkshopManager, WorkshopService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

#[cfg(any(test, feature = "test-utils"))]
pub use {
    attendance_service::MockAttendanceService, audit_service::MockAuditService,
    enrollment_service::MockEnrollmentService, family_service::MockFamilyService,
    payment_service::MockPaymentService, pricing_service::MockPricingService,
    report_service::MockReportService, staff_service::MockStaffService,
    student_service::MockStudentService, workshop_service::MockWorkshopService,
};
