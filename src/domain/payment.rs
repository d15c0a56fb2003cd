//! Payments (pagos) and billing periods.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Other => "other",
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(s: &str) -> Self {
        match s {
            "cash" => PaymentMethod::Cash,
            "transfer" => PaymentMethod::Transfer,
            "card" => PaymentMethod::Card,
            _ => PaymentMethod::Other,
        }
    }
}

/// Month a fee belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillingPeriod {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 9)]
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation("Month must be between 1 and 12"));
        }
        if !(2000..=2100).contains(&year) {
            return Err(AppError::validation("Year is out of range"));
        }
        Ok(Self { year, month })
    }

    /// Re-check a period that came in through deserialization.
    pub fn checked(self) -> AppResult<Self> {
        Self::new(self.year, self.month)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub period: BillingPeriod,
    /// Whole currency units
    pub amount: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<String>,
}

impl Payment {
    pub fn is_voided(&self) -> bool {
        self.voided_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewPayment {
    pub student_id: Uuid,
    pub period: BillingPeriod,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
    pub method: PaymentMethod,
    /// Defaults to today
    pub paid_on: Option<NaiveDate>,
    #[validate(length(max = 500, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VoidPayment {
    #[validate(custom(function = "validate_reason"))]
    pub reason: String,
}

impl VoidPayment {
    /// The reason with surrounding whitespace removed, if it still says something
    pub fn trimmed_reason(&self) -> AppResult<&str> {
        let reason = self.reason.trim();
        match reason.chars().count() {
            n if n < MIN_REASON_CHARS => Err(AppError::validation("A reason is required")),
            n if n > MAX_REASON_CHARS => Err(AppError::validation(
                "The reason must be at most 500 characters",
            )),
            _ => Ok(reason),
        }
    }
}

const MIN_REASON_CHARS: usize = 3;
const MAX_REASON_CHARS: usize = 500;

fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    let len = reason.trim().chars().count();
    if (MIN_REASON_CHARS..=MAX_REASON_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new("reason").with_message("A reason is required".into()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub student_id: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    #[serde(default)]
    pub include_voided: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_bounds() {
        let feb = BillingPeriod::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = BillingPeriod::new(2024, 12).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(dec.to_string(), "2024-12");
    }

    #[test]
    fn test_period_rejects_invalid_month() {
        assert!(BillingPeriod::new(2024, 0).is_err());
        assert!(BillingPeriod::new(2024, 13).is_err());
    }

    #[test]
    fn test_method_fallback() {
        assert_eq!(PaymentMethod::from("transfer"), PaymentMethod::Transfer);
        assert_eq!(PaymentMethod::from("cheque"), PaymentMethod::Other);
    }

    #[test]
    fn test_void_reason_must_say_something_after_trimming() {
        let blank = VoidPayment {
            reason: "     ".to_string(),
        };
        assert!(blank.validate().is_err());
        assert!(matches!(blank.trimmed_reason(), Err(AppError::Validation(_))));

        let padded = VoidPayment {
            reason: "  ok  ".to_string(),
        };
        assert!(padded.validate().is_err());

        let fine = VoidPayment {
            reason: " duplicado ".to_string(),
        };
        assert!(fine.validate().is_ok());
        assert_eq!(fine.trimmed_reason().unwrap(), "duplicado");
    }
}
