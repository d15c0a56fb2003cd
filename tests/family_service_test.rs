//! Family groups.

mod common;

use chrono::Utc;
use mockall::predicate::*;
use uuid::Uuid;

use alumni::domain::{FamilyGroup, StaffRole};
use alumni::errors::AppError;
use alumni::infra::repositories::{MockFamilyRepository, MockStudentRepository};
use alumni::services::{FamilyManager, FamilyService};

use common::{actor, student, TestUnitOfWork};

fn service(uow: TestUnitOfWork) -> FamilyManager<TestUnitOfWork> {
    FamilyManager::new(uow.into_arc())
}

fn family(id: Uuid) -> FamilyGroup {
    FamilyGroup {
        id,
        name: "Gómez".to_string(),
        contact_name: None,
        contact_phone: None,
        contact_email: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

fn families_returning(id: Uuid) -> MockFamilyRepository {
    let mut families = MockFamilyRepository::new();
    families
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(family(id))));
    families
}

#[tokio::test]
async fn test_family_with_active_members_cannot_be_deleted() {
    let id = Uuid::new_v4();
    let mut families = families_returning(id);
    families.expect_delete().never();
    let mut students = MockStudentRepository::new();
    students.expect_list_by_family().with(eq(id)).returning(move |_| {
        let mut gone = student(Uuid::new_v4());
        gone.deleted_at = Some(Utc::now());
        Ok(vec![student(Uuid::new_v4()), student(Uuid::new_v4()), gone])
    });
    let uow = TestUnitOfWork::default()
        .with_families(families)
        .with_students(students);

    let result = service(uow).delete_family(&actor(StaffRole::Admin), id).await;

    match result {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "Family still has 2 active student(s)"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_family_with_only_removed_members_is_deleted() {
    let id = Uuid::new_v4();
    let mut families = families_returning(id);
    families
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(()));
    let mut students = MockStudentRepository::new();
    students.expect_list_by_family().returning(|_| {
        let mut gone = student(Uuid::new_v4());
        gone.deleted_at = Some(Utc::now());
        Ok(vec![gone])
    });
    let uow = TestUnitOfWork::default()
        .with_families(families)
        .with_students(students)
        .with_audit_sink();

    service(uow)
        .delete_family(&actor(StaffRole::Coordinator), id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_teacher_cannot_delete_families() {
    let result = service(TestUnitOfWork::default())
        .delete_family(&actor(StaffRole::Teacher), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_get_family_not_found() {
    let mut families = MockFamilyRepository::new();
    families.expect_find_by_id().returning(|_| Ok(None));

    let result = service(TestUnitOfWork::default().with_families(families))
        .get_family(Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
