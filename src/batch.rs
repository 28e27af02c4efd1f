//! Batch orchestration
//!
//! A batch runs in two phases over the package list:
//!
//! 1. **Resolve**: query the registry and select the latest qualifying release.
//!    Packages that fail here are reported and skipped in phase two.
//! 2. **Fetch**: locate the primary artifact of each resolved release and
//!    download it into the destination directory.
//!
//! A failure is confined to the package it belongs to. Reports come back in
//! input order whatever the concurrency. With `max_concurrent_downloads > 1`
//! packages within a phase are processed by a bounded pool, and two packages
//! never write to the same destination path: the later one in input order is
//! reported as a failed download instead.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::artifact::locate_primary;
use crate::config::{Config, DownloadJob};
use crate::error::{RequestError, Result};
use crate::fetcher::{ArtifactFetcher, HttpFetcher, part_path};
use crate::registry::{RegistryClient, ReleaseSource};
use crate::selector::take_latest;
use crate::types::{
    BatchReport, DownloadInfo, Loader, Outcome, PackageId, PackageReport, ReleaseRecord,
    StabilityTier,
};

/// Parameters shared by every package of one batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    /// Target game version
    pub platform_version: String,
    /// Loader the releases must target
    pub loader: Loader,
    /// Least stable tier to accept
    pub minimum_tier: StabilityTier,
    /// Existing directory artifacts are written into
    pub destination: PathBuf,
}

impl BatchRequest {
    /// Request for `job`, using `default_tier` when the job names none
    pub fn from_job(job: &DownloadJob, default_tier: StabilityTier) -> Self {
        Self {
            platform_version: job.platform_version.clone(),
            loader: job.loader,
            minimum_tier: job.minimum_tier.unwrap_or(default_tier),
            destination: job.destination.clone(),
        }
    }
}

/// Drives resolve and fetch across a list of packages
#[derive(Clone)]
pub struct BatchDownloader {
    source: Arc<dyn ReleaseSource>,
    fetcher: Arc<dyn ArtifactFetcher>,
    max_concurrent: usize,
}

enum FetchStep {
    Done(Outcome),
    Fetch { info: DownloadInfo, path: PathBuf },
}

impl BatchDownloader {
    /// Downloader backed by the HTTP registry client and fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_components(
            Arc::new(RegistryClient::new(&config.registry)?),
            Arc::new(HttpFetcher::new(&config.registry)?),
            config.download.max_concurrent_downloads,
        ))
    }

    /// Downloader over caller-supplied components
    ///
    /// A `max_concurrent` of zero is treated as one.
    pub fn with_components(
        source: Arc<dyn ReleaseSource>,
        fetcher: Arc<dyn ArtifactFetcher>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Resolve and fetch every package, returning one report per package in input order
    pub async fn run(&self, packages: &[PackageId], request: &BatchRequest) -> BatchReport {
        info!(
            packages = packages.len(),
            platform_version = %request.platform_version,
            loader = %request.loader,
            minimum_tier = %request.minimum_tier,
            destination = %request.destination.display(),
            "starting batch"
        );

        let resolved: Vec<std::result::Result<ReleaseRecord, Outcome>> = stream::iter(packages)
            .map(|package| self.resolve(package, request))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let steps = plan_fetches(packages, resolved, &request.destination);

        let outcomes: Vec<Outcome> = stream::iter(packages.iter().zip(steps))
            .map(|(package, step)| async move {
                match step {
                    FetchStep::Done(outcome) => outcome,
                    FetchStep::Fetch { info, path } => self.fetch(package, info, path).await,
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = BatchReport {
            packages: packages
                .iter()
                .cloned()
                .zip(outcomes)
                .map(|(package, outcome)| PackageReport { package, outcome })
                .collect(),
        };

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    async fn resolve(
        &self,
        package: &PackageId,
        request: &BatchRequest,
    ) -> std::result::Result<ReleaseRecord, Outcome> {
        let records = self
            .source
            .query_versions(package, &request.platform_version, request.loader)
            .await
            .map_err(|e| {
                debug!(package = %package, error = %e, "registry query failed");
                Outcome::QueryFailed(e)
            })?;

        let release = take_latest(records, request.minimum_tier).ok_or_else(|| {
            debug!(package = %package, minimum_tier = %request.minimum_tier, "no matching version");
            Outcome::NoMatchingVersion {
                minimum: request.minimum_tier,
            }
        })?;

        debug!(
            package = %package,
            version = release.label(),
            tier = %release.version_type,
            published = %release.date_published,
            "selected release"
        );
        Ok(release)
    }

    async fn fetch(&self, package: &PackageId, info: DownloadInfo, path: PathBuf) -> Outcome {
        match self.fetcher.fetch(&info.url, &path).await {
            Ok(()) => {
                info!(package = %package, file = %info.filename, "downloaded");
                Outcome::Selected { info, path }
            }
            Err(cause) => {
                debug!(package = %package, url = %info.url, error = %cause, "download failed");
                Outcome::DownloadFailed { info, cause }
            }
        }
    }
}

/// Locate primary files and claim destination paths, in input order
fn plan_fetches(
    packages: &[PackageId],
    resolved: Vec<std::result::Result<ReleaseRecord, Outcome>>,
    destination: &Path,
) -> Vec<FetchStep> {
    let mut claimed: HashMap<PathBuf, &PackageId> = HashMap::new();
    let mut steps = Vec::with_capacity(resolved.len());

    for (package, resolved) in packages.iter().zip(resolved) {
        let release = match resolved {
            Ok(release) => release,
            Err(outcome) => {
                steps.push(FetchStep::Done(outcome));
                continue;
            }
        };

        let info = match locate_primary(&release) {
            Ok(info) => info,
            Err(e) => {
                debug!(package = %package, error = %e, "primary artifact missing");
                steps.push(FetchStep::Done(Outcome::ArtifactMissing(e)));
                continue;
            }
        };

        // A fetch writes both its final path and the sibling part file
        let path = destination.join(&info.filename);
        let part = part_path(&path);
        if let Some(owner) = claimed.get(&path).or_else(|| claimed.get(&part)) {
            let cause = RequestError::Transport(format!(
                "destination {} is already written by \"{}\" in this batch",
                path.display(),
                owner
            ));
            steps.push(FetchStep::Done(Outcome::DownloadFailed { info, cause }));
            continue;
        }
        claimed.insert(path.clone(), package);
        claimed.insert(part, package);
        steps.push(FetchStep::Fetch { info, path });
    }

    steps
}
