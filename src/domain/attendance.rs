//! Attendance (asistencia) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Absent with a reason the school accepted
    Justified,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Justified => "justified",
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "justified" => Ok(AttendanceStatus::Justified),
            other => Err(AppError::validation(format!(
                "Unknown attendance status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's attendance to one class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub workshop_id: Uuid,
    pub class_date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    /// Staff member who took attendance
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single row of a class attendance sheet
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttendanceMark {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    #[validate(length(max = 500, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Attendance sheet for one class of a workshop
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ClassAttendance {
    pub workshop_id: Uuid,
    pub class_date: NaiveDate,
    #[validate(length(min = 1, max = 200, message = "Between 1 and 200 students per class"))]
    #[validate(nested)]
    pub records: Vec<AttendanceMark>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AttendanceChanges {
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 500, message = "Notes are too long"))]
    pub notes: Option<String>,
    /// Remove the current notes
    #[serde(default)]
    pub clear_notes: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    pub workshop_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    /// Inclusive lower bound on the class date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the class date
    pub to: Option<NaiveDate>,
}
