//! Report command - Prints absence and pending-class reports as JSON.

use serde::Serialize;

use crate::cli::args::{ReportArgs, ReportKind};
use crate::config::Config;
use crate::domain::AbsenceReportQuery;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the report command
pub async fn execute(args: ReportArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config).await?;
    let services = Services::from_connection(db.get_connection(), &config);

    match args.kind {
        ReportKind::Absences {
            workshop,
            threshold,
            include_closed,
        } => {
            let alerts = services
                .reports()
                .absences(AbsenceReportQuery {
                    workshop_id: workshop,
                    threshold,
                    lookback_days: None,
                    include_closed,
                })
                .await?;
            tracing::info!(count = alerts.len(), "Absence report ready");
            print_json(&alerts)
        }
        ReportKind::Pending { workshop } => {
            let pending = services.reports().pending_for_workshop(workshop).await?;
            tracing::info!(students = pending.len(), "Pending classes report ready");
            print_json(&pending)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to render report: {}", e)))?;
    println!("{}", json);
    Ok(())
}
