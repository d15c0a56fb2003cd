//! Enrollment rules that run before the capacity transaction.

mod common;

use std::sync::Arc;

use mockall::predicate::*;
use uuid::Uuid;

use alumni::domain::{NewEnrollment, StaffRole, Withdrawal};
use alumni::errors::AppError;
use alumni::infra::repositories::{
    MockEnrollmentRepository, MockStudentRepository, MockWorkshopRepository,
};
use alumni::infra::FixedClock;
use alumni::services::{EnrollmentManager, EnrollmentService};

use common::{actor, date, enrollment, reached_transaction, student, workshop, TestUnitOfWork};

fn service(uow: TestUnitOfWork) -> EnrollmentManager<TestUnitOfWork> {
    EnrollmentManager::new(uow.into_arc(), Arc::new(FixedClock(date(2024, 9, 16))))
}

fn students_found() -> MockStudentRepository {
    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_id().returning(|id| Ok(Some(student(id))));
    repo
}

#[tokio::test]
async fn test_teacher_cannot_enroll() {
    let service = service(TestUnitOfWork::default());

    let result = service
        .enroll(
            &actor(StaffRole::Teacher),
            Uuid::new_v4(),
            NewEnrollment {
                student_id: Uuid::new_v4(),
                enrolled_on: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_inactive_workshop_is_rejected() {
    let mut workshops = MockWorkshopRepository::new();
    workshops.expect_find_by_id().returning(|id| {
        let mut w = workshop(id, None);
        w.active = false;
        Ok(Some(w))
    });
    let service = service(TestUnitOfWork::default().with_workshops(workshops));

    let result = service
        .enroll(
            &actor(StaffRole::Coordinator),
            Uuid::new_v4(),
            NewEnrollment {
                student_id: Uuid::new_v4(),
                enrolled_on: None,
            },
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Workshop is not active"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_student_is_a_validation_error() {
    let mut workshops = MockWorkshopRepository::new();
    workshops.expect_find_by_id().returning(|id| Ok(Some(workshop(id, None))));
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(|_| Ok(None));
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops)
        .with_students(students);

    let result = service(uow)
        .enroll(
            &actor(StaffRole::Admin),
            Uuid::new_v4(),
            NewEnrollment {
                student_id: Uuid::new_v4(),
                enrolled_on: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_enrollment_after_workshop_end_is_rejected() {
    let mut workshops = MockWorkshopRepository::new();
    workshops.expect_find_by_id().returning(|id| {
        let mut w = workshop(id, None);
        w.ends_on = Some(date(2024, 11, 30));
        Ok(Some(w))
    });
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops)
        .with_students(students_found());

    let result = service(uow)
        .enroll(
            &actor(StaffRole::Admin),
            Uuid::new_v4(),
            NewEnrollment {
                student_id: Uuid::new_v4(),
                enrolled_on: Some(date(2024, 12, 2)),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_valid_enrollment_reaches_transaction() {
    let mut workshops = MockWorkshopRepository::new();
    workshops.expect_find_by_id().returning(|id| Ok(Some(workshop(id, None))));
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops)
        .with_students(students_found());

    let result = service(uow)
        .enroll(
            &actor(StaffRole::Coordinator),
            Uuid::new_v4(),
            NewEnrollment {
                student_id: Uuid::new_v4(),
                enrolled_on: None,
            },
        )
        .await;

    assert!(reached_transaction(result));
}

#[tokio::test]
async fn test_withdraw_without_open_enrollment_is_not_found() {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_open().returning(|_, _| Ok(None));
    let service = service(TestUnitOfWork::default().with_enrollments(enrollments));

    let result = service
        .withdraw(
            &actor(StaffRole::Admin),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Withdrawal::default(),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_withdraw_before_enrollment_date_is_rejected() {
    let (workshop_id, student_id) = (Uuid::new_v4(), Uuid::new_v4());
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_open()
        .with(eq(student_id), eq(workshop_id))
        .returning(|s, w| Ok(Some(enrollment(s, w, date(2024, 8, 5)))));
    enrollments.expect_withdraw().never();
    let service = service(TestUnitOfWork::default().with_enrollments(enrollments));

    let result = service
        .withdraw(
            &actor(StaffRole::Admin),
            workshop_id,
            student_id,
            Withdrawal {
                left_on: Some(date(2024, 8, 1)),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_withdraw_defaults_to_today_and_is_audited() {
    let (workshop_id, student_id) = (Uuid::new_v4(), Uuid::new_v4());
    let open = enrollment(student_id, workshop_id, date(2024, 3, 4));
    let open_id = open.id;

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_open()
        .returning(move |_, _| Ok(Some(open.clone())));
    enrollments
        .expect_withdraw()
        .with(eq(open_id), eq(date(2024, 9, 16)))
        .times(1)
        .returning(move |id, left_on| {
            let mut closed = enrollment(student_id, workshop_id, date(2024, 3, 4));
            closed.id = id;
            closed.left_on = Some(left_on);
            Ok(closed)
        });
    let uow = TestUnitOfWork::default()
        .with_enrollments(enrollments)
        .with_audit_sink();

    let closed = service(uow)
        .withdraw(
            &actor(StaffRole::Coordinator),
            workshop_id,
            student_id,
            Withdrawal::default(),
        )
        .await
        .unwrap();

    assert_eq!(closed.left_on, Some(date(2024, 9, 16)));
}
