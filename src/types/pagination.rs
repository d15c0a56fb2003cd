//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{AuditEntry, Payment, Student};

/// Pagination query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size, capped at 100
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Zero-based page index for the database paginator
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Page number as echoed back to the client
    pub fn page_number(&self) -> u64 {
        self.page.max(1)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(StudentPage = Paginated<Student>, PaymentPage = Paginated<Payment>, AuditPage = Paginated<AuditEntry>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Build a page from the rows and the total count a query returned
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();

        Self {
            data,
            meta: PaginationMeta {
                page: params.page_number(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let params = PaginationParams { page: 0, per_page: 1000 };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.page_index(), 0);
        assert_eq!(params.page_number(), 1);

        let params = PaginationParams { page: 3, per_page: 0 };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.page_index(), 2);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let params = PaginationParams { page: 1, per_page: 20 };
        let page = Paginated::new(vec![1, 2, 3], &params, 41);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.per_page, 20);

        let empty: Paginated<u8> = Paginated::new(Vec::new(), &params, 0);
        assert_eq!(empty.meta.total_pages, 0);
    }
}
