//! Staff (personal) domain entity and role permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_COORDINATOR, ROLE_TEACHER};
use crate::errors::{AppError, AppResult};

/// Staff roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Coordinator,
    Teacher,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => ROLE_ADMIN,
            StaffRole::Coordinator => ROLE_COORDINATOR,
            StaffRole::Teacher => ROLE_TEACHER,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }

    /// Students, families, workshops and enrollments.
    pub fn can_manage_records(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::Coordinator)
    }

    pub fn can_register_payments(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::Coordinator)
    }

    /// Whether this role may lead a workshop.
    pub fn can_teach(&self) -> bool {
        matches!(self, StaffRole::Teacher | StaffRole::Coordinator)
    }
}

/// Lenient conversion for values read back from the database.
impl From<&str> for StaffRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => StaffRole::Admin,
            ROLE_COORDINATOR => StaffRole::Coordinator,
            _ => StaffRole::Teacher,
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(StaffRole::Admin),
            ROLE_COORDINATOR => Ok(StaffRole::Coordinator),
            ROLE_TEACHER => Ok(StaffRole::Teacher),
            other => Err(AppError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff member
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Staff {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Usable for acting on the system: not deleted and not deactivated.
    pub fn is_enabled(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

/// The staff member acting on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentStaff {
    pub id: Uuid,
    pub role: StaffRole,
}

impl CurrentStaff {
    pub fn require_admin(&self) -> AppResult<()> {
        guard(self.role.is_admin())
    }

    pub fn require_records(&self) -> AppResult<()> {
        guard(self.role.can_manage_records())
    }

    pub fn require_payments(&self) -> AppResult<()> {
        guard(self.role.can_register_payments())
    }
}

impl From<&Staff> for CurrentStaff {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            role: staff.role,
        }
    }
}

fn guard(allowed: bool) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Staff creation data
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewStaff {
    #[validate(length(min = 1, max = 120, message = "First name is required"))]
    #[schema(example = "Lucía")]
    pub first_name: String,
    #[validate(length(min = 1, max = 120, message = "Last name is required"))]
    #[schema(example = "Ferreyra")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "lucia@indigoteatro.com.ar")]
    pub email: String,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    pub role: StaffRole,
}

/// Staff update data (all fields optional)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct StaffChanges {
    #[validate(length(min = 1, max = 120, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!("coordinator".parse::<StaffRole>().unwrap(), StaffRole::Coordinator);
        assert_eq!(StaffRole::Teacher.to_string(), "teacher");
        assert!("owner".parse::<StaffRole>().is_err());
        assert_eq!(StaffRole::from("garbage"), StaffRole::Teacher);
    }

    #[test]
    fn test_permissions() {
        assert!(StaffRole::Admin.can_manage_records());
        assert!(StaffRole::Coordinator.can_register_payments());
        assert!(!StaffRole::Teacher.can_manage_records());
        assert!(!StaffRole::Admin.can_teach());
        assert!(StaffRole::Coordinator.can_teach());
    }

    #[test]
    fn test_current_staff_guards() {
        let teacher = CurrentStaff {
            id: Uuid::new_v4(),
            role: StaffRole::Teacher,
        };
        assert!(matches!(teacher.require_records(), Err(AppError::Forbidden)));
        assert!(matches!(teacher.require_payments(), Err(AppError::Forbidden)));

        let coordinator = CurrentStaff {
            role: StaffRole::Coordinator,
            ..teacher
        };
        assert!(coordinator.require_records().is_ok());
        assert!(matches!(coordinator.require_admin(), Err(AppError::Forbidden)));
    }
}
