//! Wizard configuration from the environment

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use wannabe_client::HttpClient;

use crate::error::{ConfigError, SessionError};
use crate::session::{FileBackend, SessionStore};

pub const API_URL_VAR: &str = "WANNABE_API_URL";
pub const SESSION_DIR_VAR: &str = "WANNABE_SESSION_DIR";
pub const SESSION_VAR: &str = "WANNABE_SESSION";
pub const TIMEOUT_VAR: &str = "WANNABE_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    /// Backend origin the `api/...` routes are resolved against
    pub api_url: Url,
    pub session_dir: PathBuf,
    pub session_id: String,
    pub timeout: Option<Duration>,
}

impl WizardConfig {
    /// Read from process environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`WizardConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = parse_url(&var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()))?;
        let session_dir = var(SESSION_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);
        let session_id = var(SESSION_VAR).unwrap_or_else(|| DEFAULT_SESSION.to_string());
        let timeout = var(TIMEOUT_VAR)
            .map(|value| parse_timeout(TIMEOUT_VAR, &value))
            .transpose()?;

        Ok(Self {
            api_url,
            session_dir,
            session_id,
            timeout,
        })
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_url(url)?;
        Ok(self)
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_client(&self) -> wannabe_client::Result<HttpClient> {
        HttpClient::with_timeout(self.api_url.as_str(), self.timeout)
    }

    /// File-backed store for the configured session
    pub fn session_store(&self) -> Result<SessionStore, SessionError> {
        let backend = FileBackend::open(&self.session_dir, &self.session_id)?;
        Ok(SessionStore::new(Arc::new(backend)))
    }
}

pub fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join("wannabe-sessions")
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

fn parse_timeout(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidTimeout {
            name,
            value: value.to_string(),
        })
}
