//! Student records.

mod common;

use std::sync::Arc;

use mockall::predicate::*;
use uuid::Uuid;

use alumni::domain::{NewStudent, StaffRole, StudentChanges};
use alumni::errors::AppError;
use alumni::infra::repositories::{
    MockEnrollmentRepository, MockFamilyRepository, MockStudentRepository,
};
use alumni::infra::FixedClock;
use alumni::services::{StudentManager, StudentService};

use common::{actor, date, student, TestUnitOfWork};

fn service(uow: TestUnitOfWork) -> StudentManager<TestUnitOfWork> {
    StudentManager::new(uow.into_arc(), Arc::new(FixedClock(date(2024, 9, 16))))
}

fn new_student(document: Option<&str>, family_group_id: Option<Uuid>) -> NewStudent {
    NewStudent {
        first_name: "Tomás".to_string(),
        last_name: "Gómez".to_string(),
        document: document.map(str::to_string),
        birth_date: None,
        phone: None,
        email: None,
        family_group_id,
        notes: None,
    }
}

#[tokio::test]
async fn test_get_student_not_found() {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::default().with_students(students))
        .get_student(Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_teacher_cannot_create_students() {
    let result = service(TestUnitOfWork::default())
        .create_student(&actor(StaffRole::Teacher), new_student(None, None))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_duplicate_document_is_a_conflict() {
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_document_with_deleted()
        .returning(|_| Ok(Some(student(Uuid::new_v4()))));
    students.expect_create().never();

    let result = service(TestUnitOfWork::default().with_students(students))
        .create_student(&actor(StaffRole::Coordinator), new_student(Some("40.123.456"), None))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_unknown_family_is_rejected() {
    let mut families = MockFamilyRepository::new();
    families.expect_find_by_id().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::default().with_families(families))
        .create_student(
            &actor(StaffRole::Admin),
            new_student(None, Some(Uuid::new_v4())),
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Family group does not exist"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_keeping_own_document_is_not_a_conflict() {
    let id = Uuid::new_v4();
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_document_with_deleted()
        .returning(move |_| Ok(Some(student(id))));
    students
        .expect_update()
        .with(eq(id), always())
        .times(1)
        .returning(|id, _| Ok(student(id)));
    let uow = TestUnitOfWork::default()
        .with_students(students)
        .with_audit_sink();

    let updated = service(uow)
        .update_student(
            &actor(StaffRole::Admin),
            id,
            StudentChanges {
                document: Some("40123456".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, id);
}

#[tokio::test]
async fn test_delete_closes_open_enrollments() {
    let id = Uuid::new_v4();
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(student(id))));
    students.expect_delete().with(eq(id)).times(1).returning(|_| Ok(()));
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_close_all_for_student()
        .with(eq(id), eq(date(2024, 9, 16)))
        .times(1)
        .returning(|_, _| Ok(2));
    let uow = TestUnitOfWork::default()
        .with_students(students)
        .with_enrollments(enrollments)
        .with_audit_sink();

    service(uow)
        .delete_student(&actor(StaffRole::Coordinator), id)
        .await
        .unwrap();
}
