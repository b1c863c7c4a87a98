//! CareerApi trait: the sole API boundary between the wizard and the
//! pathfinder backend. Screens depend on this trait, never on reqwest.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;
use wannabe_types::{PathDetailsResponse, PathResult, RoleMatch, SelectedRoles};

pub use http::HttpClient;

/// Backend routes, relative to the configured base URL
pub mod routes {
    pub const SEARCH_SIMILAR: &str = "api/search-similar";
    pub const FIND_PATH: &str = "api/find-path";
    pub const PATH_DETAILS: &str = "api/get-path-details";
}

/// Failure to obtain a usable payload from the backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[async_trait]
pub trait CareerApi: Send + Sync {
    /// Rank canonical roles against free text, best first.
    async fn search_similar(&self, text: &str) -> Result<Vec<RoleMatch>>;

    /// Compute a path between two canonical roles.
    ///
    /// A non-2xx response that still carries a result body comes back as
    /// `Ok` with `success == false`.
    async fn find_path(&self, roles: &SelectedRoles) -> Result<PathResult>;

    /// Fetch per-transition explanations and skills for an ordered path.
    ///
    /// Same non-2xx handling as [`CareerApi::find_path`].
    async fn path_details(&self, roles: &[String]) -> Result<PathDetailsResponse>;
}
