//! Audit log handler.

use axum::{
    extract::{Extension, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::{AuditEntry, AuditFilter, CurrentStaff};
use crate::errors::AppResult;
use crate::types::{AuditPage, Paginated, PaginationParams};

pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit))
}

/// Audit entries, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Audit",
    security(("staff_id" = [])),
    params(AuditFilter, PaginationParams),
    responses(
        (status = 200, description = "Page of audit entries", body = AuditPage),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_audit(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Query(filter): Query<AuditFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AuditEntry>>> {
    Ok(Json(state.services.audit().list_entries(&actor, filter, page).await?))
}
