//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Tables keep the school's Spanish names.

pub mod attendance;
pub mod audit_entry;
pub mod enrollment;
pub mod family_group;
pub mod payment;
pub mod pricing_tier;
pub mod staff;
pub mod student;
pub mod workshop;
