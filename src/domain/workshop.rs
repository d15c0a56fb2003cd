//! Workshop (taller) domain entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::schedule::WeeklySchedule;

/// Workshop with its weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Workshop {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub schedule: WeeklySchedule,
    /// Maximum number of open enrollments (None = unlimited)
    pub capacity: Option<i32>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Workshop {
    pub fn is_enabled(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }

    /// Whether a class of this workshop takes place on `date`.
    pub fn holds_class_on(&self, date: NaiveDate) -> bool {
        date >= self.starts_on
            && self.ends_on.map_or(true, |end| date <= end)
            && self.schedule.includes(date)
    }

    pub fn is_taught_by(&self, staff_id: Uuid) -> bool {
        self.teacher_id == Some(staff_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewWorkshop {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    #[schema(example = "Teatro adolescentes")]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub schedule: WeeklySchedule,
    #[validate(range(min = 1, max = 500, message = "Capacity must be between 1 and 500"))]
    pub capacity: Option<i32>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct WorkshopChanges {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    pub clear_teacher: bool,
    pub schedule: Option<WeeklySchedule>,
    #[validate(range(min = 1, max = 500, message = "Capacity must be between 1 and 500"))]
    pub capacity: Option<i32>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WorkshopFilter {
    pub teacher_id: Option<Uuid>,
    pub active: Option<bool>,
}
