//! Student (alumno) domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// National id: digits with optional dots, 7 or 8 digits overall.
static DOCUMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\.?\d{3}\.?\d{3}$").expect("valid document regex"));

/// Student domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// National id (DNI), stored without dots
    pub document: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub family_group_id: Option<Uuid>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_enabled(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

/// Strip the thousands dots people type into a DNI.
pub fn normalize_document(document: &str) -> String {
    document.trim().replace('.', "")
}

fn validate_document(document: &str) -> Result<(), ValidationError> {
    if DOCUMENT_RE.is_match(document.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("document")
            .with_message("Document must have 7 or 8 digits".into()))
    }
}

fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date <= Utc::now().date_naive() {
        Ok(())
    } else {
        Err(ValidationError::new("birth_date")
            .with_message("Birth date cannot be in the future".into()))
    }
}

/// Student creation data
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewStudent {
    #[validate(length(min = 1, max = 120, message = "First name is required"))]
    #[schema(example = "Tomás")]
    pub first_name: String,
    #[validate(length(min = 1, max = 120, message = "Last name is required"))]
    #[schema(example = "Gómez")]
    pub last_name: String,
    #[validate(custom(function = "validate_document"))]
    #[schema(example = "40.123.456")]
    pub document: Option<String>,
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub family_group_id: Option<Uuid>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Student update data; `family_group_id: null` is not distinguishable
/// from absent, use `clear_family` to detach.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct StudentChanges {
    #[validate(length(min = 1, max = 120, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_document"))]
    pub document: Option<String>,
    #[validate(custom(function = "validate_birth_date"))]
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub family_group_id: Option<Uuid>,
    #[serde(default)]
    pub clear_family: bool,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
    pub active: Option<bool>,
}

/// Student list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilter {
    /// Matches first name, last name or document
    pub search: Option<String>,
    pub family_group_id: Option<Uuid>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_formats() {
        assert!(validate_document("40123456").is_ok());
        assert!(validate_document("40.123.456").is_ok());
        assert!(validate_document("7.123.456").is_ok());
        assert!(validate_document("123").is_err());
        assert!(validate_document("40-123-456").is_err());
    }

    #[test]
    fn test_normalize_document() {
        assert_eq!(normalize_document(" 40.123.456 "), "40123456");
    }

    #[test]
    fn test_new_student_validation() {
        let student = NewStudent {
            first_name: "".into(),
            last_name: "Gómez".into(),
            document: Some("12".into()),
            birth_date: None,
            phone: None,
            email: Some("not-an-email".into()),
            family_group_id: None,
            notes: None,
        };
        let errors = student.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("document"));
        assert!(fields.contains_key("email"));
    }
}
