//! Family group (grupo familiar) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::student::Student;

/// Students sharing a household and, usually, a single payer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamilyGroup {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A family with its member students
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FamilyDetails {
    #[serde(flatten)]
    pub family: FamilyGroup,
    pub members: Vec<Student>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewFamilyGroup {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    #[schema(example = "Familia Gómez")]
    pub name: String,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(length(max = 40))]
    pub contact_phone: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct FamilyChanges {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(length(max = 40))]
    pub contact_phone: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
