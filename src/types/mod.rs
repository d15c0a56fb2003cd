//! Types shared across handlers and repositories.

mod pagination;
mod response;

pub use pagination::{
    AuditPage, Paginated, PaginationMeta, PaginationParams, PaymentPage, StudentPage,
};
pub use response::{Created, MessageResponse, NoContent};
