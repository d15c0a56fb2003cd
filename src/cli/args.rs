//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Alumni - administration API for a workshop school
#[derive(Parser, Debug)]
#[command(name = "alumni")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Print a report as JSON
    Report(ReportArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub kind: ReportKind,
}

#[derive(Subcommand, Debug)]
pub enum ReportKind {
    /// Students with consecutive absences
    Absences {
        /// Only this workshop
        #[arg(short, long)]
        workshop: Option<Uuid>,
        /// Minimum streak length (defaults to ABSENCE_STREAK_THRESHOLD)
        #[arg(short, long)]
        threshold: Option<u32>,
        /// Include streaks the student already recovered from
        #[arg(long)]
        include_closed: bool,
    },
    /// Class dates of a workshop still missing attendance
    Pending {
        #[arg(short, long)]
        workshop: Uuid,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absence_report() {
        let cli = Cli::parse_from(["alumni", "report", "absences", "--threshold", "4"]);
        match cli.command {
            Commands::Report(ReportArgs {
                kind: ReportKind::Absences { threshold, workshop, include_closed },
            }) => {
                assert_eq!(threshold, Some(4));
                assert!(workshop.is_none());
                assert!(!include_closed);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_pending_requires_workshop() {
        assert!(Cli::try_parse_from(["alumni", "report", "pending"]).is_err());
    }
}
