//! Repository layer - Data access abstraction
//!
//! One repository per aggregate. Each trait has a sea-orm backed `*Store`
//! and, under `test-utils`, a mockall generated mock.

mod attendance_repository;
mod audit_repository;
pub(crate) mod entities;
mod enrollment_repository;
mod family_repository;
mod page;
mod payment_repository;
mod pricing_repository;
mod staff_repository;
mod student_repository;
mod workshop_repository;

pub use attendance_repository::{AttendanceRepository, AttendanceStore};
pub use audit_repository::{AuditRepository, AuditStore};
pub use enrollment_repository::{EnrollmentRepository, EnrollmentStore};
pub use family_repository::{FamilyRepository, FamilyStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use pricing_repository::{PricingRepository, PricingStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use student_repository::{StudentRepository, StudentStore};
pub use workshop_repository::{WorkshopRepository, WorkshopStore};

pub(crate) mod tx {
    //! Connection-generic operations reused inside transactions.
    pub(crate) use super::attendance_repository::upsert_class;
    pub(crate) use super::audit_repository::record as record_audit;
    pub(crate) use super::enrollment_repository::{count_open, find_open, insert as insert_enrollment};
}

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use attendance_repository::MockAttendanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use audit_repository::MockAuditRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use family_repository::MockFamilyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pricing_repository::MockPricingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use staff_repository::MockStaffRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use student_repository::MockStudentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use workshop_repository::MockWorkshopRepository;
