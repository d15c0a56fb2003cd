//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_ABSENCE_MAX_GAP_DAYS, DEFAULT_ABSENCE_STREAK_THRESHOLD, DEFAULT_DATABASE_URL,
    DEFAULT_PENDING_CLASSES_LOOKBACK_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SIBLING_DISCOUNT_PERCENT, MAX_LOOKBACK_DAYS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub absence_streak_threshold: u32,
    pub absence_max_gap_days: i64,
    pub pending_lookback_days: i64,
    pub sibling_discount_percent: u8,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("absence_streak_threshold", &self.absence_streak_threshold)
            .field("absence_max_gap_days", &self.absence_max_gap_days)
            .field("pending_lookback_days", &self.pending_lookback_days)
            .field("sibling_discount_percent", &self.sibling_discount_percent)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origin: None,
            absence_streak_threshold: DEFAULT_ABSENCE_STREAK_THRESHOLD,
            absence_max_gap_days: DEFAULT_ABSENCE_MAX_GAP_DAYS,
            pending_lookback_days: DEFAULT_PENDING_CLASSES_LOOKBACK_DAYS,
            sibling_discount_percent: DEFAULT_SIBLING_DISCOUNT_PERCENT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT, |_| true),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            absence_streak_threshold: parse_var(
                "ABSENCE_STREAK_THRESHOLD",
                DEFAULT_ABSENCE_STREAK_THRESHOLD,
                |v| *v >= 1,
            ),
            absence_max_gap_days: parse_var(
                "ABSENCE_MAX_GAP_DAYS",
                DEFAULT_ABSENCE_MAX_GAP_DAYS,
                |v| *v >= 1,
            ),
            pending_lookback_days: parse_var(
                "PENDING_CLASSES_LOOKBACK_DAYS",
                DEFAULT_PENDING_CLASSES_LOOKBACK_DAYS,
                |v| (1..=MAX_LOOKBACK_DAYS).contains(v),
            ),
            sibling_discount_percent: parse_var(
                "SIBLING_DISCOUNT_PERCENT",
                DEFAULT_SIBLING_DISCOUNT_PERCENT,
                |v| *v <= 100,
            ),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read and parse an env var, falling back to `default` when missing,
/// unparsable or rejected by `valid`.
fn parse_var<T>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(key, value = %raw, default = %default, "Invalid setting, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.absence_streak_threshold, 3);
        assert_eq!(config.absence_max_gap_days, 7);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = Config::default();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("postgres://"));
    }

    #[test]
    fn test_parse_var_rejects_out_of_range() {
        std::env::set_var("ALUMNI_TEST_PERCENT", "250");
        let value: u8 = parse_var("ALUMNI_TEST_PERCENT", 10, |v| *v <= 100);
        assert_eq!(value, 10);

        std::env::set_var("ALUMNI_TEST_PERCENT", "15");
        let value: u8 = parse_var("ALUMNI_TEST_PERCENT", 10, |v| *v <= 100);
        assert_eq!(value, 15);
        std::env::remove_var("ALUMNI_TEST_PERCENT");
    }
}
