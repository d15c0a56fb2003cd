//! API middleware.

mod identity;

pub use identity::identity_middleware;
