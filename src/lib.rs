//! Alumni - administration backend for a workshop school.
//!
//! Keeps the school's records (staff, family groups, students,
//! workshops, enrollments), takes class attendance, prices monthly fees
//! and registers payments, and reports on them. Two routines carry most
//! of the domain weight:
//!
//! - consecutive-absence detection ([`domain::absences`])
//! - pending class-date generation ([`domain::schedule`])
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line entry points
//! - **config**: environment settings and constants
//! - **domain**: entities and the pure rules built on them
//! - **services**: use cases, permission checks and auditing
//! - **infra**: database, repositories, unit of work, clock
//! - **api**: HTTP handlers, middleware and routes
//! - **types**: pagination and response helpers
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! cargo run -- serve
//! cargo run -- migrate up
//! cargo run -- report absences --threshold 3
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
