//! Error types for the engagement core

use thiserror::Error;

/// Errors raised while turning raw post data into streak input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngagementError {
    #[error("Invalid post record #{index}: unparseable timestamp '{value}'")]
    InvalidRecord { index: usize, value: String },

    #[error("Invalid timezone offset: {0} minutes")]
    InvalidTimezone(i32),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
