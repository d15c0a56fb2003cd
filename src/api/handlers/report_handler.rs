//! Report handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::{
    AbsenceAlert, AbsenceReportQuery, AttendanceReportQuery, AttendanceSummary, BillingPeriod,
    Debtor, IncomeReport,
};
use crate::errors::AppResult;

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/absences", get(absences))
        .route("/attendance", get(attendance))
        .route("/debtors", get(debtors))
        .route("/income", get(income))
}

/// Students with consecutive absences
#[utoipa::path(
    get,
    path = "/api/reports/absences",
    tag = "Reports",
    security(("staff_id" = [])),
    params(AbsenceReportQuery),
    responses(
        (status = 200, description = "Absence streaks, longest first", body = Vec<AbsenceAlert>),
        (status = 400, description = "Lookback out of range"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn absences(
    State(state): State<AppState>,
    Query(query): Query<AbsenceReportQuery>,
) -> AppResult<Json<Vec<AbsenceAlert>>> {
    Ok(Json(state.services.reports().absences(query).await?))
}

/// Monthly attendance of a workshop
#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    tag = "Reports",
    security(("staff_id" = [])),
    params(AttendanceReportQuery),
    responses(
        (status = 200, description = "Per-student counts", body = AttendanceSummary),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceReportQuery>,
) -> AppResult<Json<AttendanceSummary>> {
    Ok(Json(state.services.reports().attendance_summary(query).await?))
}

/// Students owing part of the period's fee
#[utoipa::path(
    get,
    path = "/api/reports/debtors",
    tag = "Reports",
    security(("staff_id" = [])),
    params(BillingPeriod),
    responses(
        (status = 200, description = "Debtors, largest balance first", body = Vec<Debtor>),
        (status = 400, description = "Invalid period")
    )
)]
pub async fn debtors(
    State(state): State<AppState>,
    Query(period): Query<BillingPeriod>,
) -> AppResult<Json<Vec<Debtor>>> {
    Ok(Json(state.services.reports().debtors(period).await?))
}

/// Income of a period per payment method
#[utoipa::path(
    get,
    path = "/api/reports/income",
    tag = "Reports",
    security(("staff_id" = [])),
    params(BillingPeriod),
    responses(
        (status = 200, description = "Income totals", body = IncomeReport),
        (status = 400, description = "Invalid period")
    )
)]
pub async fn income(
    State(state): State<AppState>,
    Query(period): Query<BillingPeriod>,
) -> AppResult<Json<IncomeReport>> {
    Ok(Json(state.services.reports().income(period).await?))
}
