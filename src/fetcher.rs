//! Artifact fetching
//!
//! Streams an artifact into `<destination>.part` and renames it into place
//! once the whole body has been written. A non-200 response creates no file,
//! and a failure mid-stream removes the partial file, so nothing half-written
//! is ever left at the destination path.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{RequestError, Result};
use crate::registry::build_http_client;

/// Writes the body behind a URL to a path on disk
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch `url` into `destination`, creating or replacing the file
    async fn fetch(&self, url: &str, destination: &Path) -> std::result::Result<(), RequestError>;
}

/// reqwest-backed [`ArtifactFetcher`]
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher sharing the registry's user agent and timeout
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> std::result::Result<(), RequestError> {
        debug!(url = %url, destination = %destination.display(), "fetching artifact");

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RequestError::HttpStatus(status.as_u16()));
        }

        let part_path = part_path(destination);
        let written = stream_to_file(response, &part_path).await;
        let result = match written {
            Ok(bytes) => tokio::fs::rename(&part_path, destination)
                .await
                .map(|()| bytes)
                .map_err(RequestError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                debug!(destination = %destination.display(), bytes, "artifact written");
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part_path).await
                    && cleanup.kind() != std::io::ErrorKind::NotFound
                {
                    warn!(
                        path = %part_path.display(),
                        error = %cleanup,
                        "failed to remove partial download"
                    );
                }
                Err(e)
            }
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
) -> std::result::Result<u64, RequestError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}

/// Sibling path the body is streamed into before the final rename
pub(crate) fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
