//! HTTP implementation of [`CareerApi`] over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;
use wannabe_types::{
    PathDetailsRequest, PathDetailsResponse, PathResult, RoleMatch, SearchRequest, SelectedRoles,
};

use crate::{routes, ApiError, CareerApi, Result};

/// Longest slice of an error body kept in [`ApiError::Status`]
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: Url,
}

impl HttpClient {
    /// Client without a request timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST a JSON body, returning the status and raw response bytes
    async fn post<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> Result<(StatusCode, Vec<u8>)> {
        let url = self.base_url.join(route)?;
        debug!(%url, "POST");

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(status = status.as_u16(), len = bytes.len(), route, "response");
        Ok((status, bytes.to_vec()))
    }

    /// Decode a payload whose body is meaningful regardless of status.
    ///
    /// Non-2xx bodies that decode are passed to `demote` so the caller can
    /// mark them unsuccessful; bodies that don't decode become status errors.
    fn decode_lenient<T: DeserializeOwned>(
        status: StatusCode,
        bytes: &[u8],
        demote: impl FnOnce(&mut T),
    ) -> Result<T> {
        match serde_json::from_slice::<T>(bytes) {
            Ok(mut payload) => {
                if !status.is_success() {
                    demote(&mut payload);
                }
                Ok(payload)
            }
            Err(_) if !status.is_success() => Err(status_error(status, bytes)),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }
}

#[async_trait]
impl CareerApi for HttpClient {
    async fn search_similar(&self, text: &str) -> Result<Vec<RoleMatch>> {
        let body = SearchRequest {
            text: text.to_string(),
        };
        let (status, bytes) = self.post(routes::SEARCH_SIMILAR, &body).await?;

        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn find_path(&self, roles: &SelectedRoles) -> Result<PathResult> {
        let (status, bytes) = self.post(routes::FIND_PATH, roles).await?;
        Self::decode_lenient(status, &bytes, |result: &mut PathResult| {
            result.success = false;
        })
    }

    async fn path_details(&self, roles: &[String]) -> Result<PathDetailsResponse> {
        let body = PathDetailsRequest {
            roles: roles.to_vec(),
        };
        let (status, bytes) = self.post(routes::PATH_DETAILS, &body).await?;
        Self::decode_lenient(status, &bytes, |response: &mut PathDetailsResponse| {
            response.success = false;
        })
    }
}

/// Parse the base URL and make sure relative routes join under its path
fn normalize_base(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn status_error(status: StatusCode, bytes: &[u8]) -> ApiError {
    ApiError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(bytes)
            .chars()
            .take(ERROR_BODY_LIMIT)
            .collect(),
    }
}
