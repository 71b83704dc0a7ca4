//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `HIMSOLS_CONTACT_RESET_SECS` - Seconds the contact page shows "message sent" (default: 3)
//! - `HIMSOLS_REQUEST_IDS` - Request ID scheme: `sequential`, `uuid`, or `timestamp` (default: sequential)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `RUST_LOG` - Tracing filter (default: `himsols=info`)

use std::time::Duration;

use himsols_core::RequestIdStrategy;
use himsols_core::flow::CONTACT_RESET_DELAY;
use thiserror::Error;

/// Longest auto-reset delay accepted; anything above is almost certainly a
/// milliseconds value in the seconds variable.
const MAX_RESET_SECS: u64 = 3600;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Delay before the contact form returns to idle
    pub contact_reset_delay: Duration,
    /// Which request ID generator to use
    pub request_ids: RequestIdStrategy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            contact_reset_delay: CONTACT_RESET_DELAY,
            request_ids: RequestIdStrategy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let contact_reset_delay = match lookup("HIMSOLS_CONTACT_RESET_SECS") {
            Some(raw) => parse_reset_secs(&raw)?,
            None => CONTACT_RESET_DELAY,
        };

        let request_ids = match lookup("HIMSOLS_REQUEST_IDS") {
            Some(raw) => raw.parse::<RequestIdStrategy>().map_err(|e| {
                ConfigError::InvalidEnvVar("HIMSOLS_REQUEST_IDS".to_string(), e.to_string())
            })?,
            None => RequestIdStrategy::default(),
        };

        Ok(Self {
            contact_reset_delay,
            request_ids,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

fn parse_reset_secs(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("HIMSOLS_CONTACT_RESET_SECS".to_string(), reason)
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| invalid(e.to_string()))?;
    if secs > MAX_RESET_SECS {
        return Err(invalid(format!("must be at most {MAX_RESET_SECS} (got {secs})")));
    }
    Ok(Duration::from_secs(secs))
}
