//! Request identifiers handed back after a successful local submission.
//!
//! Generation is injected through [`RequestIdGenerator`] so callers can pick
//! between a collision-free scheme and the legacy wall-clock one.

use core::fmt;
use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Confirmation shown to the user once a form passes validation.
///
/// Not a backend acknowledgement: nothing is sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub request_id: String,
}

impl SubmissionResult {
    #[must_use]
    pub const fn new(request_id: String) -> Self {
        Self { request_id }
    }
}

impl fmt::Display for SubmissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_id)
    }
}

/// Source of request identifiers.
///
/// `prefix` is the short tag of the submitting form (e.g. `TR` for tree
/// orders); the generator appends its own suffix.
pub trait RequestIdGenerator: Send + Sync {
    fn generate(&self, prefix: &str) -> SubmissionResult;
}

/// Monotonic counter. Unique for the lifetime of the generator.
#[derive(Debug)]
pub struct SequentialRequestIds {
    next: AtomicU64,
}

impl SequentialRequestIds {
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialRequestIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestIdGenerator for SequentialRequestIds {
    fn generate(&self, prefix: &str) -> SubmissionResult {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        SubmissionResult::new(format!("{prefix}{n:06}"))
    }
}

/// Random v4 UUIDs, upper-cased simple form after the prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRequestIds;

impl RequestIdGenerator for UuidRequestIds {
    fn generate(&self, prefix: &str) -> SubmissionResult {
        let id = Uuid::new_v4().simple().to_string().to_uppercase();
        SubmissionResult::new(format!("{prefix}{id}"))
    }
}

/// Prefix plus the last six digits of the current Unix time in milliseconds.
///
/// Two submissions in the same millisecond (or exactly 1000 seconds apart)
/// produce the same ID.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampRequestIds;

impl TimestampRequestIds {
    /// Suffix for a given millisecond timestamp.
    #[must_use]
    pub fn suffix(millis: i64) -> String {
        let digits = millis.to_string();
        let start = digits.len().saturating_sub(6);
        digits.get(start..).unwrap_or_default().to_string()
    }
}

impl RequestIdGenerator for TimestampRequestIds {
    fn generate(&self, prefix: &str) -> SubmissionResult {
        let suffix = Self::suffix(Utc::now().timestamp_millis());
        SubmissionResult::new(format!("{prefix}{suffix}"))
    }
}

/// Errors from parsing a [`RequestIdStrategy`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestIdError {
    #[error("unknown request id strategy: {0} (expected sequential, uuid, or timestamp)")]
    UnknownStrategy(String),
}

/// Named choice of generator, as selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestIdStrategy {
    #[default]
    Sequential,
    Uuid,
    Timestamp,
}

impl RequestIdStrategy {
    /// Build a boxed generator for this strategy.
    #[must_use]
    pub fn build(self) -> Box<dyn RequestIdGenerator> {
        match self {
            Self::Sequential => Box::new(SequentialRequestIds::new()),
            Self::Uuid => Box::new(UuidRequestIds),
            Self::Timestamp => Box::new(TimestampRequestIds),
        }
    }
}

impl fmt::Display for RequestIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Uuid => write!(f, "uuid"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl FromStr for RequestIdStrategy {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "uuid" => Ok(Self::Uuid),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(RequestIdError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sequential_ids_are_unique_and_prefixed() {
        let ids = SequentialRequestIds::new();
        let generated: HashSet<String> = (0..1000)
            .map(|_| ids.generate("TR").request_id)
            .collect();
        assert_eq!(generated.len(), 1000);
        assert!(generated.iter().all(|id| id.starts_with("TR")));
    }

    #[test]
    fn test_sequential_format() {
        let ids = SequentialRequestIds::starting_at(42);
        assert_eq!(ids.generate("SR").request_id, "SR000042");
        assert_eq!(ids.generate("SR").request_id, "SR000043");
    }

    #[test]
    fn test_uuid_ids() {
        let id = UuidRequestIds.generate("CM").request_id;
        assert!(id.starts_with("CM"));
        assert_eq!(id.len(), 2 + 32);
        assert_ne!(id, UuidRequestIds.generate("CM").request_id);
    }

    #[test]
    fn test_timestamp_suffix_keeps_last_six_digits() {
        assert_eq!(TimestampRequestIds::suffix(1_718_000_123_456), "123456");
        assert_eq!(TimestampRequestIds::suffix(42), "42");
    }

    #[test]
    fn test_timestamp_ids_collide_within_same_millisecond_window() {
        // 1000 seconds apart share their last six digits.
        let a = TimestampRequestIds::suffix(1_718_000_123_456);
        let b = TimestampRequestIds::suffix(1_718_001_123_456);
        assert_eq!(a, b);
    }

    #[test]
    fn test_timestamp_generate_shape() {
        let id = TimestampRequestIds.generate("TR").request_id;
        assert!(id.starts_with("TR"));
        assert_eq!(id.len(), 8);
        assert!(id.get(2..).unwrap().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "Sequential".parse::<RequestIdStrategy>().unwrap(),
            RequestIdStrategy::Sequential
        );
        assert_eq!(
            "uuid".parse::<RequestIdStrategy>().unwrap(),
            RequestIdStrategy::Uuid
        );
        assert!(matches!(
            "random".parse::<RequestIdStrategy>(),
            Err(RequestIdError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_build() {
        let ids = RequestIdStrategy::Sequential.build();
        assert_eq!(ids.generate("LG").request_id, "LG000001");
    }
}
