//! Application route configuration.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    attendance_routes, audit_routes, family_routes, payment_routes, pricing_routes,
    report_routes, staff_routes, student_routes, workshop_routes,
};
use super::middleware::identity_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let api = Router::new()
        .nest("/staff", staff_routes())
        .nest("/families", family_routes())
        .nest("/students", student_routes())
        .nest("/workshops", workshop_routes())
        .nest("/attendance", attendance_routes())
        .nest("/pricing", pricing_routes())
        .nest("/payments", payment_routes())
        .nest("/reports", report_routes())
        .nest("/audit", audit_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    staff_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

/// Single allowed origin when configured, otherwise any.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

async fn root() -> &'static str {
    "Alumni API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check with a database round trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "healthy",
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "unhealthy",
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
