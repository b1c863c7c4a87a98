//! Error types for the wizard core
//!
//! Screen-level failures never surface as these types: screens turn them
//! into on-screen messages. These cover the plumbing underneath (session
//! persistence and configuration).

use thiserror::Error;

/// Session store failures
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session value could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid session id '{0}': use letters, digits, '-' or '_'")]
    InvalidSessionId(String),
}

/// Configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid backend URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid {name} '{value}': expected a whole number of seconds")]
    InvalidTimeout { name: &'static str, value: String },
}
