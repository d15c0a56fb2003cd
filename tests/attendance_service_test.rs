//! Attendance sheet validation.

mod common;

use std::sync::Arc;

use mockall::predicate::*;
use uuid::Uuid;

use alumni::domain::{
    AttendanceChanges, AttendanceMark, AttendanceStatus, ClassAttendance, StaffRole,
};
use alumni::errors::AppError;
use alumni::infra::repositories::{
    MockAttendanceRepository, MockEnrollmentRepository, MockWorkshopRepository,
};
use alumni::infra::FixedClock;
use alumni::services::{AttendanceManager, AttendanceService};

use common::{
    actor, attendance, date, enrollment, reached_transaction, workshop, TestUnitOfWork,
};

fn service(uow: TestUnitOfWork) -> AttendanceManager<TestUnitOfWork> {
    // Monday
    AttendanceManager::new(uow.into_arc(), Arc::new(FixedClock(date(2024, 9, 16))))
}

fn workshops_with(workshop_id: Uuid, teacher_id: Option<Uuid>) -> MockWorkshopRepository {
    let mut repo = MockWorkshopRepository::new();
    repo.expect_find_by_id()
        .with(eq(workshop_id))
        .returning(move |id| Ok(Some(workshop(id, teacher_id))));
    repo
}

fn enrollments_of(workshop_id: Uuid, students: Vec<Uuid>) -> MockEnrollmentRepository {
    let mut repo = MockEnrollmentRepository::new();
    repo.expect_list_by_workshop()
        .with(eq(workshop_id), eq(false))
        .returning(move |_, _| {
            Ok(students
                .iter()
                .map(|s| enrollment(*s, workshop_id, date(2024, 3, 4)))
                .collect())
        });
    repo
}

fn sheet(workshop_id: Uuid, class_date: chrono::NaiveDate, students: &[Uuid]) -> ClassAttendance {
    ClassAttendance {
        workshop_id,
        class_date,
        records: students
            .iter()
            .map(|s| AttendanceMark {
                student_id: *s,
                status: AttendanceStatus::Present,
                notes: None,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_teacher_cannot_record_another_workshop() {
    let workshop_id = Uuid::new_v4();
    let uow = TestUnitOfWork::default().with_workshops(workshops_with(workshop_id, Some(Uuid::new_v4())));
    let service = service(uow);

    let result = service
        .record_class(
            &actor(StaffRole::Teacher),
            sheet(workshop_id, date(2024, 9, 16), &[Uuid::new_v4()]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_unknown_workshop_is_not_found() {
    let mut workshops = MockWorkshopRepository::new();
    workshops.expect_find_by_id().returning(|_| Ok(None));
    let service = service(TestUnitOfWork::default().with_workshops(workshops));

    let result = service
        .record_class(
            &actor(StaffRole::Coordinator),
            sheet(Uuid::new_v4(), date(2024, 9, 16), &[Uuid::new_v4()]),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_future_class_is_rejected() {
    let workshop_id = Uuid::new_v4();
    let service = service(TestUnitOfWork::default().with_workshops(workshops_with(workshop_id, None)));

    let result = service
        .record_class(
            &actor(StaffRole::Admin),
            sheet(workshop_id, date(2024, 9, 19), &[Uuid::new_v4()]),
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains("future")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_day_outside_schedule_is_rejected() {
    let workshop_id = Uuid::new_v4();
    let service = service(TestUnitOfWork::default().with_workshops(workshops_with(workshop_id, None)));

    // Friday
    let result = service
        .record_class(
            &actor(StaffRole::Admin),
            sheet(workshop_id, date(2024, 9, 13), &[Uuid::new_v4()]),
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains("not a class day")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_date_before_workshop_start_is_rejected() {
    let workshop_id = Uuid::new_v4();
    let service = service(TestUnitOfWork::default().with_workshops(workshops_with(workshop_id, None)));

    let result = service
        .record_class(
            &actor(StaffRole::Admin),
            sheet(workshop_id, date(2024, 2, 26), &[Uuid::new_v4()]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_duplicate_student_is_rejected() {
    let workshop_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let service = service(TestUnitOfWork::default().with_workshops(workshops_with(workshop_id, None)));

    let result = service
        .record_class(
            &actor(StaffRole::Admin),
            sheet(workshop_id, date(2024, 9, 12), &[student_id, student_id]),
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains("more than once")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_student_not_enrolled_is_rejected() {
    let workshop_id = Uuid::new_v4();
    let enrolled = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops_with(workshop_id, None))
        .with_enrollments(enrollments_of(workshop_id, vec![enrolled]));
    let service = service(uow);

    let result = service
        .record_class(
            &actor(StaffRole::Admin),
            sheet(workshop_id, date(2024, 9, 12), &[enrolled, stranger]),
        )
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains(&stranger.to_string())),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_own_workshop_sheet_reaches_transaction() {
    let workshop_id = Uuid::new_v4();
    let teacher = actor(StaffRole::Teacher);
    let students = vec![Uuid::new_v4(), Uuid::new_v4()];
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops_with(workshop_id, Some(teacher.id)))
        .with_enrollments(enrollments_of(workshop_id, students.clone()));
    let service = service(uow);

    let result = service
        .record_class(&teacher, sheet(workshop_id, date(2024, 9, 16), &students))
        .await;

    assert!(reached_transaction(result));
}

#[tokio::test]
async fn test_list_rejects_inverted_range() {
    let service = service(TestUnitOfWork::default());

    let result = service
        .list(alumni::domain::AttendanceFilter {
            from: Some(date(2024, 9, 10)),
            to: Some(date(2024, 9, 1)),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

fn absence(workshop_id: Uuid) -> alumni::domain::Attendance {
    attendance(Uuid::new_v4(), workshop_id, date(2024, 9, 12), AttendanceStatus::Absent)
}

#[tokio::test]
async fn test_notes_cannot_be_set_and_cleared_together() {
    let mut records = MockAttendanceRepository::new();
    records.expect_find_by_id().never();
    records.expect_update().never();

    let result = service(TestUnitOfWork::default().with_attendance(records))
        .update_record(
            &actor(StaffRole::Admin),
            Uuid::new_v4(),
            AttendanceChanges {
                notes: Some("llegó tarde".to_string()),
                clear_notes: true,
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_clearing_notes_reaches_the_repository() {
    let (id, workshop_id) = (Uuid::new_v4(), Uuid::new_v4());
    let mut records = MockAttendanceRepository::new();
    records.expect_find_by_id().returning(move |id| {
        let mut record = absence(workshop_id);
        record.id = id;
        record.notes = Some("llegó tarde".to_string());
        Ok(Some(record))
    });
    records
        .expect_update()
        .withf(move |record_id, changes, _| {
            *record_id == id && changes.clear_notes && changes.notes.is_none()
        })
        .times(1)
        .returning(move |id, _, _| {
            let mut record = absence(workshop_id);
            record.id = id;
            Ok(record)
        });
    let uow = TestUnitOfWork::default()
        .with_workshops(workshops_with(workshop_id, None))
        .with_attendance(records)
        .with_audit_sink();

    let updated = service(uow)
        .update_record(
            &actor(StaffRole::Admin),
            id,
            AttendanceChanges {
                clear_notes: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.notes, None);
}
