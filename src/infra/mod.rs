//! Infrastructure layer - database access and system services
//!
//! - Database connection and migrations
//! - Repositories over the sea-orm entities
//! - Unit of Work for transaction management
//! - Clock

pub mod clock;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{Database, Migrator};
pub use repositories::{
    AttendanceRepository, AuditRepository, EnrollmentRepository, FamilyRepository,
    PaymentRepository, PricingRepository, StaffRepository, StudentRepository, WorkshopRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};
