//! Student handlers, including a student's enrollments, pending classes
//! and monthly fee.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    CurrentStaff, Enrollment, FeeQuote, NewStudent, PendingClasses, Student, StudentChanges,
    StudentFilter,
};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams, StudentPage};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/:id", get(get_student).put(update_student).delete(delete_student))
        .route("/:id/restore", post(restore_student))
        .route("/:id/enrollments", get(list_student_enrollments))
        .route("/:id/pending-classes", get(student_pending_classes))
        .route("/:id/fee", get(student_fee))
}

/// List students, paginated
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    security(("staff_id" = [])),
    params(StudentFilter, PaginationParams),
    responses((status = 200, description = "Page of students", body = StudentPage))
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Student>>> {
    let students = state.services.students().list_students(filter, page).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Student>> {
    Ok(Json(state.services.students().get_student(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    security(("staff_id" = [])),
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Teachers cannot manage students"),
        (status = 409, description = "Document already registered")
    )
)]
pub async fn create_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewStudent>,
) -> AppResult<Created<Student>> {
    let student = state.services.students().create_student(&actor, payload).await?;
    Ok(Created(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = StudentChanges,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Document already registered")
    )
)]
pub async fn update_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<StudentChanges>,
) -> AppResult<Json<Student>> {
    let student = state.services.students().update_student(&actor, id, payload).await?;
    Ok(Json(student))
}

/// Soft delete a student and close their open enrollments
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.students().delete_student(&actor, id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    post,
    path = "/api/students/{id}/restore",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student restored", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn restore_student(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Student>> {
    let student = state.services.students().restore_student(&actor, id).await?;
    Ok(Json(student))
}

/// Enrollment history of a student
#[utoipa::path(
    get,
    path = "/api/students/{id}/enrollments",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollments, open and closed", body = Vec<Enrollment>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_student_enrollments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Enrollment>>> {
    Ok(Json(state.services.enrollments().list_for_student(id).await?))
}

/// Classes of the student's workshops still missing attendance
#[utoipa::path(
    get,
    path = "/api/students/{id}/pending-classes",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Pending class dates per workshop", body = Vec<PendingClasses>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_pending_classes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PendingClasses>>> {
    Ok(Json(state.services.reports().pending_for_student(id).await?))
}

/// Monthly fee for the student's current enrollments
#[utoipa::path(
    get,
    path = "/api/students/{id}/fee",
    tag = "Students",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Fee quote", body = FeeQuote),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_fee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FeeQuote>> {
    Ok(Json(state.services.pricing().quote_fee(id).await?))
}
