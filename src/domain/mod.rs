//! Domain layer - Core business entities and logic
//!
//! School records (students, families, staff, workshops), the
//! attendance and billing rules built on them, and the two scheduling
//! routines: consecutive-absence detection and pending class dates.
//!
//! Nothing here touches the database; repositories convert to and from
//! these types.

pub mod absences;
pub mod attendance;
pub mod audit;
pub mod enrollment;
pub mod family;
pub mod payment;
pub mod pricing;
pub mod report;
pub mod schedule;
pub mod staff;
pub mod student;
pub mod workshop;

pub use absences::{detect_streaks, AbsenceStreak, StreakPolicy};
pub use attendance::{
    Attendance, AttendanceChanges, AttendanceFilter, AttendanceMark, AttendanceStatus,
    ClassAttendance,
};
pub use audit::{AuditAction, AuditEntry, AuditFilter, NewAuditEntry};
pub use enrollment::{check_admission, Enrollment, NewEnrollment, Withdrawal};
pub use family::{FamilyChanges, FamilyDetails, FamilyGroup, NewFamilyGroup};
pub use payment::{BillingPeriod, NewPayment, Payment, PaymentFilter, PaymentMethod, VoidPayment};
pub use pricing::{quote_fee, select_tier, FeeQuote, NewPricingTier, PricingTier, PricingTierChanges};
pub use report::{
    find_debtors, full_price_payer, income_report, merge_pending, name_or_id, summarize_attendance,
    AbsenceAlert, AbsenceReportQuery, AttendanceReportQuery, AttendanceSummary, Debtor,
    IncomeReport, MethodTotal, PendingClasses, StudentAttendance,
};
pub use schedule::{pending_class_dates, ClassWindow, WeeklySchedule};
pub use staff::{CurrentStaff, NewStaff, Staff, StaffChanges, StaffRole};
pub use student::{NewStudent, Student, StudentChanges, StudentFilter};
pub use workshop::{NewWorkshop, Workshop, WorkshopChanges, WorkshopFilter};
