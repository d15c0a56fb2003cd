//! Read models for the reports and the pure functions that build them.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::absences::AbsenceStreak;
use super::attendance::{Attendance, AttendanceStatus};
use super::enrollment::Enrollment;
use super::payment::{BillingPeriod, Payment, PaymentMethod};
use super::pricing::{quote_fee, PricingTier};
use super::student::Student;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AbsenceReportQuery {
    pub workshop_id: Option<Uuid>,
    /// Minimum streak length; defaults to the configured threshold
    pub threshold: Option<u32>,
    /// How far back to look; defaults to the configured lookback
    pub lookback_days: Option<i64>,
    /// Also list streaks the student already recovered from
    #[serde(default)]
    pub include_closed: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceReportQuery {
    pub workshop_id: Uuid,
    pub year: i32,
    pub month: u32,
}

/// A streak labelled for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AbsenceAlert {
    pub student_id: Uuid,
    pub student_name: String,
    pub workshop_id: Uuid,
    pub workshop_name: String,
    pub count: u32,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub ongoing: bool,
}

impl AbsenceAlert {
    pub fn new(streak: AbsenceStreak, student_name: String, workshop_name: String) -> Self {
        Self {
            student_id: streak.student_id,
            student_name,
            workshop_id: streak.workshop_id,
            workshop_name,
            count: streak.count,
            first_date: streak.first_date,
            last_date: streak.last_date,
            ongoing: streak.ongoing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentAttendance {
    pub student_id: Uuid,
    pub student_name: String,
    pub present: u32,
    pub absent: u32,
    pub justified: u32,
    /// present / recorded, 0 when nothing was recorded
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub workshop_id: Uuid,
    pub workshop_name: String,
    pub period: BillingPeriod,
    /// Distinct class dates with at least one record
    pub classes_recorded: u32,
    pub students: Vec<StudentAttendance>,
}

/// Per-student attendance counts, ordered by student name.
pub fn summarize_attendance(
    records: &[Attendance],
    names: &HashMap<Uuid, String>,
) -> (u32, Vec<StudentAttendance>) {
    let dates: HashSet<NaiveDate> = records.iter().map(|r| r.class_date).collect();

    let mut counts: HashMap<Uuid, [u32; 3]> = HashMap::new();
    for record in records {
        let slot = match record.status {
            AttendanceStatus::Present => 0,
            AttendanceStatus::Absent => 1,
            AttendanceStatus::Justified => 2,
        };
        counts.entry(record.student_id).or_default()[slot] += 1;
    }

    let mut students: Vec<StudentAttendance> = counts
        .into_iter()
        .map(|(student_id, [present, absent, justified])| {
            let recorded = present + absent + justified;
            StudentAttendance {
                student_id,
                student_name: name_or_id(names, student_id),
                present,
                absent,
                justified,
                attendance_rate: if recorded == 0 {
                    0.0
                } else {
                    f64::from(present) / f64::from(recorded)
                },
            }
        })
        .collect();

    students.sort_by(|a, b| {
        a.student_name
            .cmp(&b.student_name)
            .then(a.student_id.cmp(&b.student_id))
    });

    (dates.len() as u32, students)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Debtor {
    pub student_id: Uuid,
    pub student_name: String,
    pub family_group_id: Option<Uuid>,
    pub enrolled_workshops: u32,
    pub expected: i64,
    pub paid: i64,
    pub balance: i64,
}

/// Member of a family who pays full price: the earliest registered
/// non-deleted member holding an open enrollment.
pub fn full_price_payer<'a, I>(members: I, enrolled: &HashSet<Uuid>) -> Option<Uuid>
where
    I: IntoIterator<Item = &'a Student>,
{
    members
        .into_iter()
        .filter(|s| s.deleted_at.is_none() && enrolled.contains(&s.id))
        .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        .map(|s| s.id)
}

/// Students with open enrollments whose payments for the period fall short
/// of their quoted fee. Largest balance first.
pub fn find_debtors(
    students: &[Student],
    open_enrollments: &[Enrollment],
    tiers: &[PricingTier],
    payments: &[Payment],
    sibling_discount_percent: u8,
) -> Vec<Debtor> {
    let mut workshops_per_student: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for enrollment in open_enrollments.iter().filter(|e| e.is_open()) {
        workshops_per_student
            .entry(enrollment.student_id)
            .or_default()
            .insert(enrollment.workshop_id);
    }
    let enrolled: HashSet<Uuid> = workshops_per_student.keys().copied().collect();

    let mut families: HashMap<Uuid, Vec<&Student>> = HashMap::new();
    for student in students {
        if let Some(family_id) = student.family_group_id {
            families.entry(family_id).or_default().push(student);
        }
    }
    let payers: HashMap<Uuid, Option<Uuid>> = families
        .iter()
        .map(|(family_id, members)| (*family_id, full_price_payer(members.iter().copied(), &enrolled)))
        .collect();

    let mut paid: HashMap<Uuid, i64> = HashMap::new();
    for payment in payments.iter().filter(|p| !p.is_voided()) {
        *paid.entry(payment.student_id).or_default() += payment.amount;
    }

    let mut debtors: Vec<Debtor> = students
        .iter()
        .filter(|s| s.is_enabled())
        .filter_map(|student| {
            let workshops = workshops_per_student.get(&student.id)?.len() as u32;
            let sibling = student
                .family_group_id
                .and_then(|f| payers.get(&f).copied().flatten())
                .is_some_and(|payer| payer != student.id);

            let quote = quote_fee(tiers, workshops, sibling, sibling_discount_percent);
            let paid = paid.get(&student.id).copied().unwrap_or(0);
            let balance = quote.amount - paid;

            (balance > 0).then(|| Debtor {
                student_id: student.id,
                student_name: student.full_name(),
                family_group_id: student.family_group_id,
                enrolled_workshops: workshops,
                expected: quote.amount,
                paid,
                balance,
            })
        })
        .collect();

    debtors.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then(a.student_name.cmp(&b.student_name))
            .then(a.student_id.cmp(&b.student_id))
    });
    debtors
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub count: u32,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IncomeReport {
    pub period: BillingPeriod,
    pub payments: u32,
    pub total: i64,
    pub by_method: Vec<MethodTotal>,
}

/// Totals of the non-voided payments of a period.
pub fn income_report(period: BillingPeriod, payments: &[Payment]) -> IncomeReport {
    let mut by_method: BTreeMap<&'static str, MethodTotal> = BTreeMap::new();
    let mut total = 0;
    let mut count = 0;

    for payment in payments.iter().filter(|p| !p.is_voided() && p.period == period) {
        total += payment.amount;
        count += 1;
        let entry = by_method
            .entry(payment.method.as_str())
            .or_insert(MethodTotal {
                method: payment.method,
                count: 0,
                total: 0,
            });
        entry.count += 1;
        entry.total += payment.amount;
    }

    IncomeReport {
        period,
        payments: count,
        total,
        by_method: by_method.into_values().collect(),
    }
}

/// Class dates without attendance for one enrollment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PendingClasses {
    pub student_id: Uuid,
    pub student_name: String,
    pub workshop_id: Uuid,
    pub workshop_name: String,
    pub dates: Vec<NaiveDate>,
}

/// Fold entries of the same (student, workshop), as left by re-enrollments,
/// into one with sorted, distinct dates.
pub fn merge_pending(entries: Vec<PendingClasses>) -> Vec<PendingClasses> {
    let mut merged: BTreeMap<(Uuid, Uuid), PendingClasses> = BTreeMap::new();
    for entry in entries {
        match merged.entry((entry.student_id, entry.workshop_id)) {
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                slot.get_mut().dates.extend(entry.dates);
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }
    merged
        .into_values()
        .map(|mut entry| {
            entry.dates.sort();
            entry.dates.dedup();
            entry
        })
        .collect()
}

/// Name lookup with the id as fallback for rows that vanished.
pub fn name_or_id(names: &HashMap<Uuid, String>, id: Uuid) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn student(family: Option<Uuid>, age_days: i64) -> Student {
        Student {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            last_name: format!("Paz {}", age_days),
            document: None,
            birth_date: None,
            phone: None,
            email: None,
            family_group_id: family,
            notes: None,
            active: true,
            created_at: Utc::now() - Duration::days(age_days),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn open(student_id: Uuid) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            student_id,
            workshop_id: Uuid::new_v4(),
            enrolled_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            left_on: None,
            created_at: Utc::now(),
        }
    }

    fn tier(count: i32, amount: i64) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4(),
            name: format!("{} talleres", count),
            workshop_count: count,
            monthly_amount: amount,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payment(student_id: Uuid, amount: i64, method: PaymentMethod, voided: bool) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            student_id,
            period: BillingPeriod::new(2024, 9).unwrap(),
            amount,
            method,
            paid_on: NaiveDate::from_ymd_opt(2024, 9, 5).unwrap(),
            notes: None,
            recorded_by: None,
            created_at: Utc::now(),
            voided_at: voided.then(Utc::now),
            void_reason: None,
        }
    }

    fn mark(student_id: Uuid, day: u32, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            student_id,
            workshop_id: Uuid::nil(),
            class_date: NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
            status,
            notes: None,
            recorded_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_pending_joins_re_enrollments() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let day = |d| NaiveDate::from_ymd_opt(2024, 9, d).unwrap();
        let entry = |dates: Vec<NaiveDate>| PendingClasses {
            student_id: s,
            student_name: "Ana Paz".into(),
            workshop_id: w,
            workshop_name: "Clown".into(),
            dates,
        };

        let merged = merge_pending(vec![entry(vec![day(16), day(23)]), entry(vec![day(2), day(16)])]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].dates, vec![day(2), day(16), day(23)]);
    }

    #[test]
    fn test_oldest_enrolled_member_pays_full_price() {
        let family = Some(Uuid::new_v4());
        let oldest = student(family, 300);
        let middle = student(family, 200);
        let youngest = student(family, 100);

        // the oldest member has no open enrollment
        let enrolled: HashSet<Uuid> = [middle.id, youngest.id].into_iter().collect();
        let payer = full_price_payer([&oldest, &middle, &youngest], &enrolled);
        assert_eq!(payer, Some(middle.id));
    }

    #[test]
    fn test_debtors_apply_sibling_discount_and_payments() {
        let family = Some(Uuid::new_v4());
        let first = student(family, 200);
        let sibling = student(family, 100);
        let alone = student(None, 50);

        let enrollments = vec![open(first.id), open(sibling.id), open(alone.id), open(alone.id)];
        let tiers = vec![tier(1, 30_000), tier(2, 52_000)];
        let payments = vec![
            payment(first.id, 30_000, PaymentMethod::Cash, false),
            payment(sibling.id, 27_000, PaymentMethod::Cash, true),
            payment(alone.id, 20_000, PaymentMethod::Transfer, false),
        ];

        let debtors = find_debtors(
            &[first.clone(), sibling.clone(), alone.clone()],
            &enrollments,
            &tiers,
            &payments,
            10,
        );

        assert_eq!(debtors.len(), 2);
        assert_eq!(debtors[0].student_id, alone.id);
        assert_eq!(debtors[0].expected, 52_000);
        assert_eq!(debtors[0].balance, 32_000);
        assert_eq!(debtors[1].student_id, sibling.id);
        assert_eq!(debtors[1].expected, 27_000);
        assert_eq!(debtors[1].paid, 0);
    }

    #[test]
    fn test_income_ignores_voided_payments() {
        let period = BillingPeriod::new(2024, 9).unwrap();
        let s = Uuid::new_v4();
        let payments = vec![
            payment(s, 10_000, PaymentMethod::Cash, false),
            payment(s, 5_000, PaymentMethod::Cash, false),
            payment(s, 7_000, PaymentMethod::Card, false),
            payment(s, 9_999, PaymentMethod::Card, true),
        ];

        let report = income_report(period, &payments);
        assert_eq!(report.total, 22_000);
        assert_eq!(report.payments, 3);
        assert_eq!(report.by_method.len(), 2);
        let cash = report
            .by_method
            .iter()
            .find(|m| m.method == PaymentMethod::Cash)
            .unwrap();
        assert_eq!((cash.count, cash.total), (2, 15_000));
    }

    #[test]
    fn test_attendance_summary_rates() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let names: HashMap<Uuid, String> =
            [(a, "Ana Paz".to_string()), (b, "Bruno Díaz".to_string())].into();
        let records = vec![
            mark(a, 2, AttendanceStatus::Present),
            mark(a, 5, AttendanceStatus::Absent),
            mark(a, 9, AttendanceStatus::Present),
            mark(a, 12, AttendanceStatus::Justified),
            mark(b, 2, AttendanceStatus::Absent),
        ];

        let (classes, rows) = summarize_attendance(&records, &names);
        assert_eq!(classes, 4);
        assert_eq!(rows[0].student_name, "Ana Paz");
        assert_eq!((rows[0].present, rows[0].absent, rows[0].justified), (2, 1, 1));
        assert!((rows[0].attendance_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(rows[1].attendance_rate, 0.0);
    }
}
