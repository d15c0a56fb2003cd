//! Gateway identity middleware.
//!
//! The school's gateway authenticates staff and forwards their id in
//! `X-Staff-Id`. The id is resolved to an active staff member and placed
//! in the request extensions as [`CurrentStaff`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::STAFF_ID_HEADER;
use crate::domain::CurrentStaff;
use crate::errors::AppError;

pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let staff_id = request
        .headers()
        .get(STAFF_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or(AppError::Unauthorized)?;

    let current: CurrentStaff = state.services.staff().identify(staff_id).await?;
    tracing::Span::current().record("staff_id", tracing::field::display(current.id));

    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}
