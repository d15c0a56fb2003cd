//! Family group handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentStaff, FamilyChanges, FamilyDetails, FamilyGroup, NewFamilyGroup};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

pub fn family_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_families).post(create_family))
        .route("/:id", get(get_family).put(update_family).delete(delete_family))
}

/// List family groups
#[utoipa::path(
    get,
    path = "/api/families",
    tag = "Families",
    security(("staff_id" = [])),
    responses((status = 200, description = "Family groups", body = Vec<FamilyGroup>))
)]
pub async fn list_families(State(state): State<AppState>) -> AppResult<Json<Vec<FamilyGroup>>> {
    Ok(Json(state.services.families().list_families().await?))
}

/// Get a family group with its members
#[utoipa::path(
    get,
    path = "/api/families/{id}",
    tag = "Families",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Family group ID")),
    responses(
        (status = 200, description = "Family group and members", body = FamilyDetails),
        (status = 404, description = "Family group not found")
    )
)]
pub async fn get_family(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FamilyDetails>> {
    Ok(Json(state.services.families().get_family(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/families",
    tag = "Families",
    security(("staff_id" = [])),
    request_body = NewFamilyGroup,
    responses(
        (status = 201, description = "Family group created", body = FamilyGroup),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Teachers cannot manage families")
    )
)]
pub async fn create_family(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewFamilyGroup>,
) -> AppResult<Created<FamilyGroup>> {
    let family = state.services.families().create_family(&actor, payload).await?;
    Ok(Created(family))
}

#[utoipa::path(
    put,
    path = "/api/families/{id}",
    tag = "Families",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Family group ID")),
    request_body = FamilyChanges,
    responses(
        (status = 200, description = "Family group updated", body = FamilyGroup),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Family group not found")
    )
)]
pub async fn update_family(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<FamilyChanges>,
) -> AppResult<Json<FamilyGroup>> {
    let family = state.services.families().update_family(&actor, id, payload).await?;
    Ok(Json(family))
}

/// Soft delete a family group without active members
#[utoipa::path(
    delete,
    path = "/api/families/{id}",
    tag = "Families",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Family group ID")),
    responses(
        (status = 204, description = "Family group deleted"),
        (status = 404, description = "Family group not found"),
        (status = 409, description = "Family still has active students")
    )
)]
pub async fn delete_family(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.families().delete_family(&actor, id).await?;
    Ok(NoContent)
}
