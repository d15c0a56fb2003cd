//! Fee quotes with the sibling discount.

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;

use alumni::domain::{NewPricingTier, PricingTier, StaffRole};
use alumni::errors::AppError;
use alumni::infra::repositories::{
    MockEnrollmentRepository, MockPricingRepository, MockStudentRepository,
};
use alumni::services::{PricingManager, PricingService};

use common::{actor, date, enrollment, student, TestUnitOfWork};

fn tiers() -> Vec<PricingTier> {
    [(1, 30_000), (2, 52_000)]
        .into_iter()
        .map(|(count, amount)| PricingTier {
            id: Uuid::new_v4(),
            name: format!("{} talleres", count),
            workshop_count: count,
            monthly_amount: amount,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .collect()
}

/// Two siblings, `older` registered a year before `younger`, both enrolled
/// in two workshops.
fn family_uow(older: Uuid, younger: Uuid, family_id: Uuid) -> TestUnitOfWork {
    let members = move || {
        let mut a = student(older);
        a.family_group_id = Some(family_id);
        a.created_at = Utc::now() - Duration::days(365);
        let mut b = student(younger);
        b.family_group_id = Some(family_id);
        vec![a, b]
    };

    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(move |id| {
        Ok(members().into_iter().find(|s| s.id == id))
    });
    students
        .expect_list_by_family()
        .returning(move |_| Ok(members()));

    let (w1, w2) = (Uuid::new_v4(), Uuid::new_v4());
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_list_by_student()
        .returning(move |s, _| {
            Ok(vec![
                enrollment(s, w1, date(2024, 3, 4)),
                enrollment(s, w2, date(2024, 3, 4)),
            ])
        });
    enrollments
        .expect_list_open_for_students()
        .returning(move |ids| {
            Ok(ids
                .into_iter()
                .map(|s| enrollment(s, w1, date(2024, 3, 4)))
                .collect())
        });

    let mut pricing = MockPricingRepository::new();
    pricing.expect_list().returning(|| Ok(tiers()));

    TestUnitOfWork::default()
        .with_students(students)
        .with_enrollments(enrollments)
        .with_pricing(pricing)
}

#[tokio::test]
async fn test_first_registered_sibling_pays_full_price() {
    let (older, younger) = (Uuid::new_v4(), Uuid::new_v4());
    let service = PricingManager::new(family_uow(older, younger, Uuid::new_v4()).into_arc(), 10);

    let quote = service.quote_fee(older).await.unwrap();

    assert_eq!(quote.enrolled_workshops, 2);
    assert_eq!(quote.discount_percent, 0);
    assert_eq!(quote.amount, 52_000);
}

#[tokio::test]
async fn test_younger_sibling_gets_discount() {
    let (older, younger) = (Uuid::new_v4(), Uuid::new_v4());
    let service = PricingManager::new(family_uow(older, younger, Uuid::new_v4()).into_arc(), 10);

    let quote = service.quote_fee(younger).await.unwrap();

    assert_eq!(quote.base_amount, 52_000);
    assert_eq!(quote.discount_percent, 10);
    assert_eq!(quote.amount, 46_800);
}

#[tokio::test]
async fn test_student_without_family_pays_full_price() {
    let student_id = Uuid::new_v4();
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(|id| Ok(Some(student(id))));
    students.expect_list_by_family().never();
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_list_by_student()
        .returning(|s, _| Ok(vec![enrollment(s, Uuid::new_v4(), date(2024, 3, 4))]));
    let mut pricing = MockPricingRepository::new();
    pricing.expect_list().returning(|| Ok(tiers()));
    let uow = TestUnitOfWork::default()
        .with_students(students)
        .with_enrollments(enrollments)
        .with_pricing(pricing);

    let quote = PricingManager::new(uow.into_arc(), 10)
        .quote_fee(student_id)
        .await
        .unwrap();

    assert_eq!(quote.amount, 30_000);
}

#[tokio::test]
async fn test_only_admins_manage_tiers() {
    let service = PricingManager::new(TestUnitOfWork::default().into_arc(), 10);

    let result = service
        .create_tier(
            &actor(StaffRole::Coordinator),
            NewPricingTier {
                name: "Tres talleres".to_string(),
                workshop_count: 3,
                monthly_amount: 70_000,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}
