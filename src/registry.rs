//! Registry query client
//!
//! Lists every release of one project that matches a loader and a game
//! version. The registry takes both filters as JSON arrays in the query
//! string, so a single loader becomes `loaders=["fabric"]`.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{Error, RequestError, Result};
use crate::types::{Loader, PackageId, ReleaseRecord};

/// Source of release listings
///
/// [`RegistryClient`] is the HTTP implementation; tests and embedders can
/// supply their own.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// All releases of `package` for `platform_version` and `loader`
    ///
    /// An empty list is a successful answer.
    async fn query_versions(
        &self,
        package: &PackageId,
        platform_version: &str,
        loader: Loader,
    ) -> std::result::Result<Vec<ReleaseRecord>, RequestError>;
}

/// HTTP client for the registry's version-listing endpoint
#[derive(Clone, Debug)]
pub struct RegistryClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    /// Create a client for the configured registry
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot be parsed or cannot
    /// carry path segments, or the HTTP client cannot be built.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| Error::config("base_url", format!("invalid registry URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(
                "base_url",
                format!("registry URL cannot carry a path: {}", base_url),
            ));
        }

        Ok(Self {
            http_client: build_http_client(config)?,
            base_url,
        })
    }

    /// Base URL requests are built from
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/project/{id}/version?loaders=[..]&game_versions=[..]`
    pub fn versions_url(&self, package: &PackageId, platform_version: &str, loader: Loader) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["project", package.as_str(), "version"]);
        }
        url.query_pairs_mut()
            .append_pair("loaders", &json_filter(loader.as_str()))
            .append_pair("game_versions", &json_filter(platform_version));
        url
    }
}

#[async_trait]
impl ReleaseSource for RegistryClient {
    async fn query_versions(
        &self,
        package: &PackageId,
        platform_version: &str,
        loader: Loader,
    ) -> std::result::Result<Vec<ReleaseRecord>, RequestError> {
        let url = self.versions_url(package, platform_version, loader);
        debug!(package = %package, url = %url, "querying registry");

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(package = %package, status = status.as_u16(), "registry returned non-200");
            return Err(RequestError::HttpStatus(status.as_u16()));
        }

        let records: Vec<ReleaseRecord> = response.json().await?;
        debug!(package = %package, count = records.len(), "registry listed releases");
        Ok(records)
    }
}

/// Shared client construction for registry and artifact requests
pub(crate) fn build_http_client(config: &RegistryConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
}

/// Single-element JSON string array, e.g. `["1.20.1"]`
fn json_filter(value: &str) -> String {
    serde_json::Value::Array(vec![serde_json::Value::String(value.to_string())]).to_string()
}
