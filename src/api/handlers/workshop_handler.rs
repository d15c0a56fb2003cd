//! Workshop handlers, including enrollments and pending classes of a
//! workshop.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CurrentStaff, Enrollment, NewEnrollment, NewWorkshop, PendingClasses, Withdrawal, Workshop,
    WorkshopChanges, WorkshopFilter,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentListQuery {
    /// Only enrollments without a withdrawal date
    #[serde(default)]
    pub open_only: bool,
}

pub fn workshop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workshops).post(create_workshop))
        .route("/:id", get(get_workshop).put(update_workshop).delete(delete_workshop))
        .route("/:id/enrollments", get(list_enrollments).post(enroll_student))
        .route("/:id/enrollments/:student_id", delete(withdraw_student))
        .route("/:id/pending-classes", get(workshop_pending_classes))
}

#[utoipa::path(
    get,
    path = "/api/workshops",
    tag = "Workshops",
    security(("staff_id" = [])),
    params(WorkshopFilter),
    responses((status = 200, description = "Workshops", body = Vec<Workshop>))
)]
pub async fn list_workshops(
    State(state): State<AppState>,
    Query(filter): Query<WorkshopFilter>,
) -> AppResult<Json<Vec<Workshop>>> {
    Ok(Json(state.services.workshops().list_workshops(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/workshops/{id}",
    tag = "Workshops",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop", body = Workshop),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn get_workshop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Workshop>> {
    Ok(Json(state.services.workshops().get_workshop(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/workshops",
    tag = "Workshops",
    security(("staff_id" = [])),
    request_body = NewWorkshop,
    responses(
        (status = 201, description = "Workshop created", body = Workshop),
        (status = 400, description = "Invalid schedule, dates or teacher"),
        (status = 403, description = "Teachers cannot manage workshops")
    )
)]
pub async fn create_workshop(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewWorkshop>,
) -> AppResult<Created<Workshop>> {
    let workshop = state.services.workshops().create_workshop(&actor, payload).await?;
    Ok(Created(workshop))
}

#[utoipa::path(
    put,
    path = "/api/workshops/{id}",
    tag = "Workshops",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = WorkshopChanges,
    responses(
        (status = 200, description = "Workshop updated", body = Workshop),
        (status = 400, description = "Invalid schedule, dates or teacher"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn update_workshop(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<WorkshopChanges>,
) -> AppResult<Json<Workshop>> {
    let workshop = state.services.workshops().update_workshop(&actor, id, payload).await?;
    Ok(Json(workshop))
}

#[utoipa::path(
    delete,
    path = "/api/workshops/{id}",
    tag = "Workshops",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 204, description = "Workshop deleted"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn delete_workshop(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.workshops().delete_workshop(&actor, id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/api/workshops/{id}/enrollments",
    tag = "Enrollments",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID"), EnrollmentListQuery),
    responses(
        (status = 200, description = "Enrollments of the workshop", body = Vec<Enrollment>),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EnrollmentListQuery>,
) -> AppResult<Json<Vec<Enrollment>>> {
    let enrollments = state
        .services
        .enrollments()
        .list_for_workshop(id, query.open_only)
        .await?;
    Ok(Json(enrollments))
}

/// Enroll a student, respecting the workshop's capacity
#[utoipa::path(
    post,
    path = "/api/workshops/{id}/enrollments",
    tag = "Enrollments",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = NewEnrollment,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 400, description = "Inactive student or workshop"),
        (status = 404, description = "Workshop not found"),
        (status = 409, description = "Already enrolled or workshop full")
    )
)]
pub async fn enroll_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewEnrollment>,
) -> AppResult<Created<Enrollment>> {
    let enrollment = state.services.enrollments().enroll(&actor, id, payload).await?;
    Ok(Created(enrollment))
}

/// Withdraw a student; the body is optional
#[utoipa::path(
    delete,
    path = "/api/workshops/{id}/enrollments/{student_id}",
    tag = "Enrollments",
    security(("staff_id" = [])),
    params(
        ("id" = Uuid, Path, description = "Workshop ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    request_body(content = Withdrawal, description = "Optional; the date defaults to today"),
    responses(
        (status = 200, description = "Enrollment closed", body = Enrollment),
        (status = 400, description = "Withdrawal before enrollment date"),
        (status = 404, description = "No open enrollment")
    )
)]
pub async fn withdraw_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<Withdrawal>>,
) -> AppResult<Json<Enrollment>> {
    let withdrawal = payload.map(|Json(w)| w).unwrap_or_default();
    let enrollment = state
        .services
        .enrollments()
        .withdraw(&actor, id, student_id, withdrawal)
        .await?;
    Ok(Json(enrollment))
}

/// Classes of the workshop still missing attendance, per student
#[utoipa::path(
    get,
    path = "/api/workshops/{id}/pending-classes",
    tag = "Workshops",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Pending class dates per student", body = Vec<PendingClasses>),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn workshop_pending_classes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PendingClasses>>> {
    Ok(Json(state.services.reports().pending_for_workshop(id).await?))
}
