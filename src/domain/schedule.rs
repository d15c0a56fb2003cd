//! Weekly workshop schedule and the pending class-date generator.
//!
//! A workshop meets on a fixed set of weekdays. Given an enrollment, the
//! generator projects that schedule forward from the enrollment date to
//! today and returns every class date that still has no attendance
//! record, which is what teachers are asked to fill in.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Days and hours a workshop meets every week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklySchedule {
    /// ISO weekday numbers, Monday = 1 .. Sunday = 7
    #[serde(with = "iso_weekdays")]
    #[schema(value_type = Vec<u8>, example = json!([1, 4]))]
    pub weekdays: Vec<Weekday>,
    #[schema(value_type = String, example = "18:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "20:00:00")]
    pub end_time: NaiveTime,
}

impl WeeklySchedule {
    /// Build a schedule, sorting and de-duplicating weekdays.
    pub fn new(
        mut weekdays: Vec<Weekday>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<Self> {
        if weekdays.is_empty() {
            return Err(AppError::validation("A workshop needs at least one weekday"));
        }
        if start_time >= end_time {
            return Err(AppError::validation("Start time must be before end time"));
        }

        weekdays.sort_by_key(|d| d.number_from_monday());
        weekdays.dedup();

        Ok(Self {
            weekdays,
            start_time,
            end_time,
        })
    }

    /// Rebuild from the stored form (`"1,4"`).
    pub fn from_stored(
        weekdays: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<Self> {
        Self::new(parse_weekdays(weekdays)?, start_time, end_time)
    }

    /// Re-check a schedule that came in through deserialization.
    pub fn normalized(self) -> AppResult<Self> {
        Self::new(self.weekdays, self.start_time, self.end_time)
    }

    /// Whether a class takes place on `date`.
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&date.weekday())
    }

    /// Stored form of the weekdays, e.g. `"1,4"`.
    pub fn weekdays_to_stored(&self) -> String {
        self.weekdays
            .iter()
            .map(|d| d.number_from_monday().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse comma separated ISO weekday numbers.
pub fn parse_weekdays(raw: &str) -> AppResult<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .ok()
                .and_then(weekday_from_iso)
                .ok_or_else(|| AppError::validation(format!("Invalid weekday '{}'", part)))
        })
        .collect()
}

pub fn weekday_from_iso(n: u8) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

mod iso_weekdays {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(days.iter().map(|d| d.number_from_monday() as u8))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Weekday>, D::Error> {
        Vec::<u8>::deserialize(d)?
            .into_iter()
            .map(|n| {
                super::weekday_from_iso(n)
                    .ok_or_else(|| D::Error::custom(format!("invalid weekday {}", n)))
            })
            .collect()
    }
}

/// Dates bounding the classes an enrollment is expected to attend.
#[derive(Debug, Clone, Copy)]
pub struct ClassWindow {
    pub enrolled_on: NaiveDate,
    pub workshop_starts_on: Option<NaiveDate>,
    pub workshop_ends_on: Option<NaiveDate>,
    pub left_on: Option<NaiveDate>,
}

impl ClassWindow {
    /// Inclusive `[from, to]` range after clamping to today and the lookback,
    /// or `None` when nothing falls inside it.
    pub fn clamp(&self, today: NaiveDate, lookback_days: i64) -> Option<(NaiveDate, NaiveDate)> {
        let floor = today - Duration::days(lookback_days.max(0));
        let from = [Some(self.enrolled_on), self.workshop_starts_on, Some(floor)]
            .into_iter()
            .flatten()
            .max()?;
        let to = [Some(today), self.workshop_ends_on, self.left_on]
            .into_iter()
            .flatten()
            .min()?;

        (from <= to).then_some((from, to))
    }
}

/// Class dates in `window` (up to `today`) that have no attendance record.
///
/// The result is ascending and free of duplicates. Work is bounded by
/// `lookback_days`, regardless of how old the enrollment is.
pub fn pending_class_dates(
    schedule: &WeeklySchedule,
    window: &ClassWindow,
    today: NaiveDate,
    recorded: &HashSet<NaiveDate>,
    lookback_days: i64,
) -> Vec<NaiveDate> {
    let Some((from, to)) = window.clamp(today, lookback_days) else {
        return Vec::new();
    };

    from.iter_days()
        .take_while(|date| *date <= to)
        .filter(|date| schedule.includes(*date) && !recorded.contains(date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn mon_thu() -> WeeklySchedule {
        WeeklySchedule::new(vec![Weekday::Thu, Weekday::Mon, Weekday::Mon], time(18), time(20))
            .unwrap()
    }

    fn window(enrolled_on: NaiveDate) -> ClassWindow {
        ClassWindow {
            enrolled_on,
            workshop_starts_on: None,
            workshop_ends_on: None,
            left_on: None,
        }
    }

    #[test]
    fn test_schedule_normalizes_weekdays() {
        let schedule = mon_thu();
        assert_eq!(schedule.weekdays, vec![Weekday::Mon, Weekday::Thu]);
        assert_eq!(schedule.weekdays_to_stored(), "1,4");
    }

    #[test]
    fn test_schedule_rejects_bad_input() {
        assert!(WeeklySchedule::new(vec![], time(18), time(20)).is_err());
        assert!(WeeklySchedule::new(vec![Weekday::Mon], time(20), time(18)).is_err());
        assert!(parse_weekdays("1,8").is_err());
        assert!(parse_weekdays("x").is_err());
    }

    #[test]
    fn test_from_stored_round_trip() {
        let schedule = WeeklySchedule::from_stored("4, 1", time(18), time(20)).unwrap();
        assert_eq!(schedule, mon_thu());
    }

    #[test]
    fn test_pending_dates_from_enrollment_to_today() {
        // 2024-09-02 is a Monday
        let today = date(2024, 9, 16);
        let pending = pending_class_dates(
            &mon_thu(),
            &window(date(2024, 9, 2)),
            today,
            &HashSet::new(),
            180,
        );
        assert_eq!(
            pending,
            vec![
                date(2024, 9, 2),
                date(2024, 9, 5),
                date(2024, 9, 9),
                date(2024, 9, 12),
                date(2024, 9, 16),
            ]
        );
    }

    #[test]
    fn test_pending_dates_skip_recorded() {
        let recorded: HashSet<_> = [date(2024, 9, 5), date(2024, 9, 9)].into_iter().collect();
        let pending = pending_class_dates(
            &mon_thu(),
            &window(date(2024, 9, 2)),
            date(2024, 9, 12),
            &recorded,
            180,
        );
        assert_eq!(pending, vec![date(2024, 9, 2), date(2024, 9, 12)]);
    }

    #[test]
    fn test_future_enrollment_has_no_pending_dates() {
        let pending = pending_class_dates(
            &mon_thu(),
            &window(date(2024, 10, 1)),
            date(2024, 9, 16),
            &HashSet::new(),
            180,
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn test_window_respects_workshop_and_withdrawal_bounds() {
        let w = ClassWindow {
            enrolled_on: date(2024, 8, 1),
            workshop_starts_on: Some(date(2024, 9, 3)),
            workshop_ends_on: None,
            left_on: Some(date(2024, 9, 10)),
        };
        let pending = pending_class_dates(&mon_thu(), &w, date(2024, 9, 30), &HashSet::new(), 180);
        assert_eq!(pending, vec![date(2024, 9, 5), date(2024, 9, 9)]);
    }

    #[test]
    fn test_lookback_bounds_old_enrollments() {
        let today = date(2024, 9, 16);
        let pending = pending_class_dates(
            &mon_thu(),
            &window(date(2020, 3, 2)),
            today,
            &HashSet::new(),
            7,
        );
        // 2024-09-09 (Mon), 2024-09-12 (Thu), 2024-09-16 (Mon)
        assert_eq!(pending.len(), 3);
        assert_eq!(pending.first(), Some(&date(2024, 9, 9)));
    }

    #[test]
    fn test_serde_uses_iso_numbers() {
        let json = serde_json::to_value(mon_thu()).unwrap();
        assert_eq!(json["weekdays"], serde_json::json!([1, 4]));

        let parsed: WeeklySchedule = serde_json::from_value(serde_json::json!({
            "weekdays": [6],
            "start_time": "10:00:00",
            "end_time": "12:30:00"
        }))
        .unwrap();
        assert_eq!(parsed.weekdays, vec![Weekday::Sat]);

        let invalid = serde_json::from_value::<WeeklySchedule>(serde_json::json!({
            "weekdays": [0],
            "start_time": "10:00:00",
            "end_time": "12:30:00"
        }));
        assert!(invalid.is_err());
    }
}
