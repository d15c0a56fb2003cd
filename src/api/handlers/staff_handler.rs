//! Staff handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentStaff, NewStaff, Staff, StaffChanges};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffListQuery {
    /// Also list deactivated staff
    #[serde(default)]
    pub include_inactive: bool,
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/:id", get(get_staff).put(update_staff).delete(delete_staff))
        .route("/:id/restore", post(restore_staff))
}

/// List staff members
#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    security(("staff_id" = [])),
    params(StaffListQuery),
    responses(
        (status = 200, description = "Staff members", body = Vec<Staff>),
        (status = 401, description = "Unknown or missing staff id")
    )
)]
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<StaffListQuery>,
) -> AppResult<Json<Vec<Staff>>> {
    let staff = state.services.staff().list_staff(query.include_inactive).await?;
    Ok(Json(staff))
}

/// Get a staff member
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member", body = Staff),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Staff>> {
    Ok(Json(state.services.staff().get_staff(id).await?))
}

/// Create a staff member (admin only)
#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    security(("staff_id" = [])),
    request_body = NewStaff,
    responses(
        (status = 201, description = "Staff member created", body = Staff),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_staff(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewStaff>,
) -> AppResult<Created<Staff>> {
    let staff = state.services.staff().create_staff(&actor, payload).await?;
    Ok(Created(staff))
}

/// Update a staff member (admin only)
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = StaffChanges,
    responses(
        (status = 200, description = "Staff member updated", body = Staff),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn update_staff(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<StaffChanges>,
) -> AppResult<Json<Staff>> {
    let staff = state.services.staff().update_staff(&actor, id, payload).await?;
    Ok(Json(staff))
}

/// Soft delete a staff member (admin only)
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 204, description = "Staff member deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Staff member not found"),
        (status = 400, description = "Cannot delete yourself")
    )
)]
pub async fn delete_staff(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.staff().delete_staff(&actor, id).await?;
    Ok(NoContent)
}

/// Restore a soft-deleted staff member (admin only)
#[utoipa::path(
    post,
    path = "/api/staff/{id}/restore",
    tag = "Staff",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member restored", body = Staff),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Staff member not found")
    )
)]
pub async fn restore_staff(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Staff>> {
    let staff = state.services.staff().restore_staff(&actor, id).await?;
    Ok(Json(staff))
}
