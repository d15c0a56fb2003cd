//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    attendance_handler, audit_handler, family_handler, payment_handler, pricing_handler,
    report_handler, staff_handler, student_handler, workshop_handler,
};
use crate::domain::{
    AbsenceAlert, Attendance, AttendanceChanges, AttendanceMark, AttendanceStatus,
    AttendanceSummary, AuditAction, AuditEntry, BillingPeriod, ClassAttendance, Debtor,
    Enrollment, FamilyChanges, FamilyDetails, FamilyGroup, FeeQuote, IncomeReport, MethodTotal,
    NewEnrollment, NewFamilyGroup, NewPayment, NewPricingTier, NewStaff, NewStudent, NewWorkshop,
    Payment, PaymentMethod, PendingClasses, PricingTier, PricingTierChanges, Staff, StaffChanges,
    StaffRole, Student, StudentAttendance, StudentChanges, VoidPayment, WeeklySchedule,
    Withdrawal, Workshop, WorkshopChanges,
};
use crate::types::{AuditPage, MessageResponse, PaginationMeta, PaymentPage, StudentPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alumni",
        version = "0.1.0",
        description = "Administration API for a workshop school: students, families, staff, \
                       workshops, enrollments, attendance, fees and payments"
    ),
    servers((url = "http://localhost:3000", description = "Local development server")),
    paths(
        staff_handler::list_staff,
        staff_handler::get_staff,
        staff_handler::create_staff,
        staff_handler::update_staff,
        staff_handler::delete_staff,
        staff_handler::restore_staff,
        family_handler::list_families,
        family_handler::get_family,
        family_handler::create_family,
        family_handler::update_family,
        family_handler::delete_family,
        student_handler::list_students,
        student_handler::get_student,
        student_handler::create_student,
        student_handler::update_student,
        student_handler::delete_student,
        student_handler::restore_student,
        student_handler::list_student_enrollments,
        student_handler::student_pending_classes,
        student_handler::student_fee,
        workshop_handler::list_workshops,
        workshop_handler::get_workshop,
        workshop_handler::create_workshop,
        workshop_handler::update_workshop,
        workshop_handler::delete_workshop,
        workshop_handler::list_enrollments,
        workshop_handler::enroll_student,
        workshop_handler::withdraw_student,
        workshop_handler::workshop_pending_classes,
        attendance_handler::list_attendance,
        attendance_handler::record_class,
        attendance_handler::update_attendance,
        attendance_handler::delete_attendance,
        pricing_handler::list_tiers,
        pricing_handler::get_tier,
        pricing_handler::create_tier,
        pricing_handler::update_tier,
        pricing_handler::delete_tier,
        payment_handler::list_payments,
        payment_handler::register_payment,
        payment_handler::void_payment,
        report_handler::absences,
        report_handler::attendance,
        report_handler::debtors,
        report_handler::income,
        audit_handler::list_audit,
    ),
    components(
        schemas(
            Staff, StaffRole, NewStaff, StaffChanges,
            FamilyGroup, FamilyDetails, NewFamilyGroup, FamilyChanges,
            Student, NewStudent, StudentChanges, StudentPage,
            Workshop, WeeklySchedule, NewWorkshop, WorkshopChanges,
            Enrollment, NewEnrollment, Withdrawal,
            Attendance, AttendanceStatus, AttendanceMark, ClassAttendance, AttendanceChanges,
            PricingTier, NewPricingTier, PricingTierChanges, FeeQuote,
            Payment, PaymentMethod, BillingPeriod, NewPayment, VoidPayment, PaymentPage,
            AbsenceAlert, AttendanceSummary, StudentAttendance, Debtor, IncomeReport, MethodTotal,
            PendingClasses,
            AuditEntry, AuditAction, AuditPage,
            PaginationMeta, MessageResponse,
        )
    ),
    modifiers(&StaffIdHeader),
    tags(
        (name = "Staff", description = "School staff and their roles"),
        (name = "Families", description = "Family groups sharing billing"),
        (name = "Students", description = "Students, their fee and pending classes"),
        (name = "Workshops", description = "Workshops and their weekly schedule"),
        (name = "Enrollments", description = "Students joining and leaving workshops"),
        (name = "Attendance", description = "Class attendance sheets"),
        (name = "Pricing", description = "Monthly fee tiers"),
        (name = "Payments", description = "Fee payments"),
        (name = "Reports", description = "Absences, attendance, debtors and income"),
        (name = "Audit", description = "Who changed what")
    )
)]
pub struct ApiDoc;

/// `X-Staff-Id` header set by the gateway
struct StaffIdHeader;

impl Modify for StaffIdHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "staff_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-Staff-Id",
                    "Id of the acting staff member, forwarded by the gateway",
                ))),
            );
        }
    }
}
