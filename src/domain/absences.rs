//! Consecutive-absence detection.
//!
//! Records are grouped per (student, workshop) and walked in date order.
//! Absences extend the current run as long as each one is at most
//! `max_gap_days` after the previous; a present or justified record, or
//! a longer gap, ends it. Runs reaching the threshold are reported.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::attendance::{Attendance, AttendanceStatus};
use crate::config::{DEFAULT_ABSENCE_MAX_GAP_DAYS, DEFAULT_ABSENCE_STREAK_THRESHOLD};

/// Detection parameters
#[derive(Debug, Clone, Copy)]
pub struct StreakPolicy {
    /// Minimum run length to report (at least 1)
    pub min_streak: u32,
    /// Largest distance in days between two absences of the same run
    pub max_gap_days: i64,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self {
            min_streak: DEFAULT_ABSENCE_STREAK_THRESHOLD,
            max_gap_days: DEFAULT_ABSENCE_MAX_GAP_DAYS,
        }
    }
}

/// A run of consecutive absences of one student in one workshop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AbsenceStreak {
    pub student_id: Uuid,
    pub workshop_id: Uuid,
    pub count: u32,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// The run reaches the latest record, i.e. the student has not come back yet
    pub ongoing: bool,
}

struct Run {
    count: u32,
    first: NaiveDate,
    last: NaiveDate,
}

impl Run {
    fn start(date: NaiveDate) -> Self {
        Self {
            count: 1,
            first: date,
            last: date,
        }
    }
}

/// Find every run of consecutive absences reaching `policy.min_streak`.
///
/// Input order does not matter. Output is sorted by count (desc), last
/// date (desc), then student and workshop ids.
pub fn detect_streaks<'a, I>(records: I, policy: StreakPolicy) -> Vec<AbsenceStreak>
where
    I: IntoIterator<Item = &'a Attendance>,
{
    let min_streak = policy.min_streak.max(1);

    let mut groups: BTreeMap<(Uuid, Uuid), Vec<(NaiveDate, AttendanceStatus)>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.student_id, record.workshop_id))
            .or_default()
            .push((record.class_date, record.status));
    }

    let mut streaks = Vec::new();

    for ((student_id, workshop_id), mut marks) in groups {
        marks.sort_by_key(|(date, _)| *date);

        let mut emit = |run: Run, ongoing: bool| {
            if run.count >= min_streak {
                streaks.push(AbsenceStreak {
                    student_id,
                    workshop_id,
                    count: run.count,
                    first_date: run.first,
                    last_date: run.last,
                    ongoing,
                });
            }
        };

        let mut current: Option<Run> = None;
        for (date, status) in marks {
            if status != AttendanceStatus::Absent {
                if let Some(run) = current.take() {
                    emit(run, false);
                }
                continue;
            }

            current = match current.take() {
                Some(mut run) if (date - run.last).num_days() <= policy.max_gap_days => {
                    run.count += 1;
                    run.last = date;
                    Some(run)
                }
                Some(run) => {
                    emit(run, false);
                    Some(Run::start(date))
                }
                None => Some(Run::start(date)),
            };
        }

        if let Some(run) = current {
            emit(run, true);
        }
    }

    streaks.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(b.last_date.cmp(&a.last_date))
            .then(a.student_id.cmp(&b.student_id))
            .then(a.workshop_id.cmp(&b.workshop_id))
    });

    streaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn mark(student: Uuid, workshop: Uuid, day: NaiveDate, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            student_id: student,
            workshop_id: workshop,
            class_date: day,
            status,
            notes: None,
            recorded_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn policy(min_streak: u32) -> StreakPolicy {
        StreakPolicy {
            min_streak,
            max_gap_days: 7,
        }
    }

    use AttendanceStatus::{Absent, Justified, Present};

    #[test]
    fn test_weekly_absences_form_one_ongoing_streak() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(s, w, date(4, 22), Absent),
            mark(s, w, date(4, 1), Present),
            mark(s, w, date(4, 8), Absent),
            mark(s, w, date(4, 15), Absent),
        ];

        let streaks = detect_streaks(&records, policy(3));
        assert_eq!(
            streaks,
            vec![AbsenceStreak {
                student_id: s,
                workshop_id: w,
                count: 3,
                first_date: date(4, 8),
                last_date: date(4, 22),
                ongoing: true,
            }]
        );
    }

    #[test]
    fn test_presence_breaks_the_run() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(s, w, date(4, 1), Absent),
            mark(s, w, date(4, 8), Absent),
            mark(s, w, date(4, 15), Present),
            mark(s, w, date(4, 22), Absent),
        ];

        let streaks = detect_streaks(&records, policy(2));
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].count, 2);
        assert!(!streaks[0].ongoing);
    }

    #[test]
    fn test_justified_absence_breaks_the_run() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(s, w, date(4, 1), Absent),
            mark(s, w, date(4, 8), Justified),
            mark(s, w, date(4, 15), Absent),
        ];

        assert!(detect_streaks(&records, policy(2)).is_empty());
    }

    #[test]
    fn test_gap_longer_than_threshold_restarts_the_run() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(s, w, date(6, 24), Absent),
            mark(s, w, date(7, 1), Absent),
            // winter break
            mark(s, w, date(7, 29), Absent),
            mark(s, w, date(8, 5), Absent),
            mark(s, w, date(8, 12), Absent),
        ];

        let streaks = detect_streaks(&records, policy(2));
        assert_eq!(streaks.len(), 2);
        assert_eq!(streaks[0].count, 3);
        assert_eq!(streaks[0].first_date, date(7, 29));
        assert!(streaks[0].ongoing);
        assert_eq!(streaks[1].count, 2);
        assert!(!streaks[1].ongoing);
    }

    #[test]
    fn test_groups_are_independent_per_workshop() {
        let s = Uuid::new_v4();
        let (w1, w2) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(s, w1, date(4, 1), Absent),
            mark(s, w2, date(4, 3), Absent),
            mark(s, w1, date(4, 8), Absent),
            mark(s, w2, date(4, 10), Present),
        ];

        let streaks = detect_streaks(&records, policy(2));
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].workshop_id, w1);
    }

    #[test]
    fn test_threshold_of_zero_behaves_like_one() {
        let (s, w) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![mark(s, w, date(4, 1), Absent)];
        assert_eq!(detect_streaks(&records, policy(0)).len(), 1);
    }

    #[test]
    fn test_output_sorted_by_count_then_recency() {
        let w = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            mark(a, w, date(4, 1), Absent),
            mark(a, w, date(4, 8), Absent),
            mark(b, w, date(4, 1), Absent),
            mark(b, w, date(4, 8), Absent),
            mark(b, w, date(4, 15), Absent),
        ];

        let streaks = detect_streaks(&records, policy(2));
        assert_eq!(streaks[0].student_id, b);
        assert_eq!(streaks[1].student_id, a);
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_streaks(&Vec::new(), StreakPolicy::default()).is_empty());
    }
}
