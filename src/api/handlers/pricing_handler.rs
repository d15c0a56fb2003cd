//! Pricing tier handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentStaff, NewPricingTier, PricingTier, PricingTierChanges};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

pub fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tiers).post(create_tier))
        .route("/:id", get(get_tier).put(update_tier).delete(delete_tier))
}

#[utoipa::path(
    get,
    path = "/api/pricing",
    tag = "Pricing",
    security(("staff_id" = [])),
    responses((status = 200, description = "Pricing tiers", body = Vec<PricingTier>))
)]
pub async fn list_tiers(State(state): State<AppState>) -> AppResult<Json<Vec<PricingTier>>> {
    Ok(Json(state.services.pricing().list_tiers().await?))
}

#[utoipa::path(
    get,
    path = "/api/pricing/{id}",
    tag = "Pricing",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Tier ID")),
    responses(
        (status = 200, description = "Pricing tier", body = PricingTier),
        (status = 404, description = "Tier not found")
    )
)]
pub async fn get_tier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PricingTier>> {
    Ok(Json(state.services.pricing().get_tier(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/pricing",
    tag = "Pricing",
    security(("staff_id" = [])),
    request_body = NewPricingTier,
    responses(
        (status = 201, description = "Tier created", body = PricingTier),
        (status = 403, description = "Admin only"),
        (status = 409, description = "An active tier already covers that many workshops")
    )
)]
pub async fn create_tier(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewPricingTier>,
) -> AppResult<Created<PricingTier>> {
    let tier = state.services.pricing().create_tier(&actor, payload).await?;
    Ok(Created(tier))
}

#[utoipa::path(
    put,
    path = "/api/pricing/{id}",
    tag = "Pricing",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Tier ID")),
    request_body = PricingTierChanges,
    responses(
        (status = 200, description = "Tier updated", body = PricingTier),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Tier not found"),
        (status = 409, description = "An active tier already covers that many workshops")
    )
)]
pub async fn update_tier(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PricingTierChanges>,
) -> AppResult<Json<PricingTier>> {
    let tier = state.services.pricing().update_tier(&actor, id, payload).await?;
    Ok(Json(tier))
}

#[utoipa::path(
    delete,
    path = "/api/pricing/{id}",
    tag = "Pricing",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Tier ID")),
    responses(
        (status = 204, description = "Tier deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Tier not found")
    )
)]
pub async fn delete_tier(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.pricing().delete_tier(&actor, id).await?;
    Ok(NoContent)
}
