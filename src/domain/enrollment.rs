//! Enrollment (inscripción) of a student into a workshop.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub workshop_id: Uuid,
    pub enrolled_on: NaiveDate,
    /// Withdrawal date; None while the enrollment is open
    pub left_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn is_open(&self) -> bool {
        self.left_on.is_none()
    }

    /// Whether the student was enrolled on `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.enrolled_on && self.left_on.map_or(true, |left| date <= left)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewEnrollment {
    pub student_id: Uuid,
    /// Defaults to today
    pub enrolled_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct Withdrawal {
    /// Defaults to today
    pub left_on: Option<NaiveDate>,
}

/// Admission rule for a new enrollment, given the open enrollments already
/// taken in the workshop. A workshop without capacity never fills up.
pub fn check_admission(already_open: bool, taken: u64, capacity: Option<i32>) -> AppResult<()> {
    if already_open {
        return Err(AppError::conflict("Student is already enrolled in this workshop"));
    }
    match capacity {
        Some(capacity) if taken >= u64::try_from(capacity).unwrap_or(0) => {
            Err(AppError::conflict("Workshop is full"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_rejects_duplicates_before_capacity() {
        let err = check_admission(true, 0, Some(10)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("already enrolled")));
    }

    #[test]
    fn test_admission_respects_capacity() {
        assert!(check_admission(false, 14, Some(15)).is_ok());
        assert!(matches!(
            check_admission(false, 15, Some(15)),
            Err(AppError::Conflict(msg)) if msg == "Workshop is full"
        ));
        assert!(check_admission(false, 1, Some(0)).is_err());
        assert!(check_admission(false, 500, None).is_ok());
    }

    #[test]
    fn test_covers_is_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let mut enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            workshop_id: Uuid::new_v4(),
            enrolled_on: d(6),
            left_on: None,
            created_at: Utc::now(),
        };
        assert!(!enrollment.covers(d(5)));
        assert!(enrollment.covers(d(6)));
        assert!(enrollment.covers(d(30)));

        enrollment.left_on = Some(d(20));
        assert!(!enrollment.is_open());
        assert!(enrollment.covers(d(20)));
        assert!(!enrollment.covers(d(21)));
    }
}
