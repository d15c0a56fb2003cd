//! Reports: absence alerts, attendance summaries, debtors, income and
//! pending class dates.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::{Config, MAX_LOOKBACK_DAYS, PENDING_QUERY_CONCURRENCY};
use crate::domain::{
    detect_streaks, find_debtors, income_report, merge_pending, name_or_id, pending_class_dates,
    summarize_attendance, AbsenceAlert, AbsenceReportQuery, AttendanceFilter,
    AttendanceReportQuery, AttendanceSummary, BillingPeriod, ClassWindow, Debtor, Enrollment,
    IncomeReport, PendingClasses, StreakPolicy, Workshop,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Clock, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Students with a run of consecutive absences
    async fn absences(&self, query: AbsenceReportQuery) -> AppResult<Vec<AbsenceAlert>>;

    /// Per-student attendance counts of a workshop for one month
    async fn attendance_summary(&self, query: AttendanceReportQuery) -> AppResult<AttendanceSummary>;

    async fn debtors(&self, period: BillingPeriod) -> AppResult<Vec<Debtor>>;

    async fn income(&self, period: BillingPeriod) -> AppResult<IncomeReport>;

    /// Classes still missing attendance, over all of a student's enrollments
    async fn pending_for_student(&self, student_id: Uuid) -> AppResult<Vec<PendingClasses>>;

    /// Classes still missing attendance, per student enrolled in a workshop
    async fn pending_for_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<PendingClasses>>;
}

/// Report defaults taken from [`Config`]
#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    pub absence_streak_threshold: u32,
    pub absence_max_gap_days: i64,
    pub lookback_days: i64,
    pub sibling_discount_percent: u8,
}

impl From<&Config> for ReportSettings {
    fn from(config: &Config) -> Self {
        Self {
            absence_streak_threshold: config.absence_streak_threshold,
            absence_max_gap_days: config.absence_max_gap_days,
            lookback_days: config.pending_lookback_days,
            sibling_discount_percent: config.sibling_discount_percent,
        }
    }
}

pub struct ReportManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
    settings: ReportSettings,
}

impl<U: UnitOfWork> ReportManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>, settings: ReportSettings) -> Self {
        Self {
            uow,
            clock,
            settings,
        }
    }

    async fn student_names(&self, ids: HashSet<Uuid>) -> AppResult<HashMap<Uuid, String>> {
        let students = self.uow.students().find_many(ids.into_iter().collect()).await?;
        Ok(students.into_iter().map(|s| (s.id, s.full_name())).collect())
    }

    async fn workshop_names(&self, ids: HashSet<Uuid>) -> AppResult<HashMap<Uuid, String>> {
        let workshops = self.uow.workshops().find_many(ids.into_iter().collect()).await?;
        Ok(workshops.into_iter().map(|w| (w.id, w.name)).collect())
    }

    /// Pending dates of one enrollment; `None` when nothing is missing.
    async fn pending_for(
        &self,
        enrollment: &Enrollment,
        workshop: &Workshop,
        student_name: String,
    ) -> AppResult<Option<PendingClasses>> {
        let window = ClassWindow {
            enrolled_on: enrollment.enrolled_on,
            workshop_starts_on: Some(workshop.starts_on),
            workshop_ends_on: workshop.ends_on,
            left_on: enrollment.left_on,
        };
        let today = self.clock.today();
        if window.clamp(today, self.settings.lookback_days).is_none() {
            return Ok(None);
        }

        let recorded: HashSet<_> = self
            .uow
            .attendance()
            .recorded_dates(enrollment.student_id, workshop.id)
            .await?
            .into_iter()
            .collect();
        let dates = pending_class_dates(
            &workshop.schedule,
            &window,
            today,
            &recorded,
            self.settings.lookback_days,
        );

        Ok((!dates.is_empty()).then(|| PendingClasses {
            student_id: enrollment.student_id,
            student_name,
            workshop_id: workshop.id,
            workshop_name: workshop.name.clone(),
            dates,
        }))
    }
}

#[async_trait]
impl<U: UnitOfWork> ReportService for ReportManager<U> {
    async fn absences(&self, query: AbsenceReportQuery) -> AppResult<Vec<AbsenceAlert>> {
        let threshold = query
            .threshold
            .unwrap_or(self.settings.absence_streak_threshold)
            .max(1);
        let lookback = query.lookback_days.unwrap_or(self.settings.lookback_days);
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback) {
            return Err(AppError::validation(format!(
                "lookback_days must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if let Some(workshop_id) = query.workshop_id {
            self.uow.workshops().find_by_id(workshop_id).await?.ok_or_not_found()?;
        }

        let today = self.clock.today();
        let records = self
            .uow
            .attendance()
            .list(AttendanceFilter {
                workshop_id: query.workshop_id,
                student_id: None,
                from: Some(today - Duration::days(lookback)),
                to: Some(today),
            })
            .await?;

        let policy = StreakPolicy {
            min_streak: threshold,
            max_gap_days: self.settings.absence_max_gap_days,
        };
        let streaks: Vec<_> = detect_streaks(&records, policy)
            .into_iter()
            .filter(|s| query.include_closed || s.ongoing)
            .collect();
        if streaks.is_empty() {
            return Ok(Vec::new());
        }

        let (students, workshops) = parallel::join2(
            self.student_names(streaks.iter().map(|s| s.student_id).collect()),
            self.workshop_names(streaks.iter().map(|s| s.workshop_id).collect()),
        )
        .await?;

        tracing::debug!(records = records.len(), streaks = streaks.len(), threshold, "Absence report built");

        Ok(streaks
            .into_iter()
            .map(|streak| {
                let student = name_or_id(&students, streak.student_id);
                let workshop = name_or_id(&workshops, streak.workshop_id);
                AbsenceAlert::new(streak, student, workshop)
            })
            .collect())
    }

    async fn attendance_summary(&self, query: AttendanceReportQuery) -> AppResult<AttendanceSummary> {
        let period = BillingPeriod::new(query.year, query.month)?;
        let workshop = self
            .uow
            .workshops()
            .find_by_id(query.workshop_id)
            .await?
            .ok_or_not_found()?;

        let records = self
            .uow
            .attendance()
            .list(AttendanceFilter {
                workshop_id: Some(workshop.id),
                student_id: None,
                from: Some(period.first_day()),
                to: Some(period.last_day()),
            })
            .await?;

        let names = self
            .student_names(records.iter().map(|r| r.student_id).collect())
            .await?;
        let (classes_recorded, students) = summarize_attendance(&records, &names);

        Ok(AttendanceSummary {
            workshop_id: workshop.id,
            workshop_name: workshop.name,
            period,
            classes_recorded,
            students,
        })
    }

    async fn debtors(&self, period: BillingPeriod) -> AppResult<Vec<Debtor>> {
        let period = period.checked()?;

        let (open, tiers, payments) = parallel::join3(
            self.uow.enrollments().list_open(),
            self.uow.pricing().list(),
            self.uow.payments().list_for_period(period),
        )
        .await?;

        let ids: HashSet<Uuid> = open.iter().map(|e| e.student_id).collect();
        let students = self.uow.students().find_many(ids.into_iter().collect()).await?;

        Ok(find_debtors(
            &students,
            &open,
            &tiers,
            &payments,
            self.settings.sibling_discount_percent,
        ))
    }

    async fn income(&self, period: BillingPeriod) -> AppResult<IncomeReport> {
        let period = period.checked()?;
        let payments = self.uow.payments().list_for_period(period).await?;
        Ok(income_report(period, &payments))
    }

    async fn pending_for_student(&self, student_id: Uuid) -> AppResult<Vec<PendingClasses>> {
        let student = self
            .uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or_not_found()?;

        let enrollments = self.uow.enrollments().list_by_student(student.id, false).await?;
        let workshops: HashMap<Uuid, Workshop> = self
            .uow
            .workshops()
            .find_many(enrollments.iter().map(|e| e.workshop_id).collect())
            .await?
            .into_iter()
            .filter(|w| w.deleted_at.is_none())
            .map(|w| (w.id, w))
            .collect();

        let name = student.full_name();
        let mut pending = Vec::new();
        for enrollment in &enrollments {
            // deleted workshops no longer expect attendance
            let Some(workshop) = workshops.get(&enrollment.workshop_id) else {
                continue;
            };
            if let Some(classes) = self.pending_for(enrollment, workshop, name.clone()).await? {
                pending.push(classes);
            }
        }

        let mut pending = merge_pending(pending);
        pending.sort_by(|a, b| {
            a.workshop_name
                .cmp(&b.workshop_name)
                .then(a.workshop_id.cmp(&b.workshop_id))
        });
        Ok(pending)
    }

    async fn pending_for_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<PendingClasses>> {
        let workshop = self
            .uow
            .workshops()
            .find_by_id(workshop_id)
            .await?
            .ok_or_not_found()?;

        let enrollments = self.uow.enrollments().list_by_workshop(workshop.id, false).await?;
        let names: HashMap<Uuid, String> = self
            .uow
            .students()
            .find_many(enrollments.iter().map(|e| e.student_id).collect())
            .await?
            .into_iter()
            .filter(|s| s.deleted_at.is_none())
            .map(|s| (s.id, s.full_name()))
            .collect();

        // deleted students are left out
        let lookups = enrollments.iter().filter_map(|enrollment| {
            let name = names.get(&enrollment.student_id)?.clone();
            Some(self.pending_for(enrollment, &workshop, name))
        });
        let joined: std::pin::Pin<
            Box<dyn std::future::Future<Output = AppResult<Vec<Option<PendingClasses>>>> + Send + '_>,
        > = Box::pin(parallel::join_all_limited(lookups, PENDING_QUERY_CONCURRENCY));
        let found = joined.await?;
        let mut pending = merge_pending(found.into_iter().flatten().collect());

        pending.sort_by(|a, b| {
            a.student_name
                .cmp(&b.student_name)
                .then(a.student_id.cmp(&b.student_id))
        });
        Ok(pending)
    }
}
