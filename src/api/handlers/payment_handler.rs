//! Payment handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentStaff, NewPayment, Payment, PaymentFilter, VoidPayment};
use crate::errors::AppResult;
use crate::types::{Created, Paginated, PaginationParams, PaymentPage};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(register_payment))
        .route("/:id/void", post(void_payment))
}

/// List payments, newest first
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    security(("staff_id" = [])),
    params(PaymentFilter, PaginationParams),
    responses((status = 200, description = "Page of payments", body = PaymentPage))
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Payment>>> {
    Ok(Json(state.services.payments().list_payments(filter, page).await?))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    security(("staff_id" = [])),
    request_body = NewPayment,
    responses(
        (status = 201, description = "Payment registered", body = Payment),
        (status = 400, description = "Invalid period, amount or date"),
        (status = 403, description = "Teachers cannot register payments")
    )
)]
pub async fn register_payment(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewPayment>,
) -> AppResult<Created<Payment>> {
    let payment = state.services.payments().register_payment(&actor, payload).await?;
    Ok(Created(payment))
}

/// Void a payment (admin only)
#[utoipa::path(
    post,
    path = "/api/payments/{id}/void",
    tag = "Payments",
    security(("staff_id" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = VoidPayment,
    responses(
        (status = 200, description = "Payment voided", body = Payment),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is already voided")
    )
)]
pub async fn void_payment(
    Extension(actor): Extension<CurrentStaff>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<VoidPayment>,
) -> AppResult<Json<Payment>> {
    let payment = state.services.payments().void_payment(&actor, id, payload).await?;
    Ok(Json(payment))
}
