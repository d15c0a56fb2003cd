//! Attendance handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Attendance, AttendanceChanges, AttendanceFilter, ClassAttendance, CurrentStaff};
use crate::errors::AppResult;
use crate::types::NoContent;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/classes", post(record_class))
        .route("/:id", put(update_attendance).delete(delete_attendance))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    security(("staff_id" = [])),
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records by date", body = Vec<Attendance>),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> AppResult<Json<Vec<Attendance>>> {
    Ok(Json(state.services.attendance().list(filter).await?))
}

/// Record the attendance sheet of one class
///
/// Marks already stored for the same student and date are overwritten.
#[utoipa::path(
    post,
    path = "/api/attendance/classes",
    tag = "Attendance",
    security(("staff_id" = [])),
    request_body = ClassAttendance,
    responses(
        (status = 200, description = "Stored records", body = Vec<Attendance>),
        (status = 400, description = "Not a class day, future date, duplicate or unenrolled student"),
        (status = 403, description = "Teacher of another workshop"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn record_class(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ClassAttendance>,
) -> AppResult<Json<Vec<Attendance>>> {
    let records = state.services.attendance().record_class(&actor, payload).await?;
    Ok(Json(records))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    tag = "Attendance",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = AttendanceChanges,
    responses(
        (status = 200, description = "Record updated", body = Attendance),
        (status = 403, description = "Teacher of another workshop"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_attendance(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AttendanceChanges>,
) -> AppResult<Json<Attendance>> {
    let record = state.services.attendance().update_record(&actor, id, payload).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    tag = "Attendance",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 403, description = "Teacher of another workshop"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_attendance(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.attendance().delete_record(&actor, id).await?;
    Ok(NoContent)
}
