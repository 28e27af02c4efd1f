//! Job-list driver
//!
//! Reads identifier lists, loads job-list documents and runs one batch per
//! job, sequentially and in listed order.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::batch::{BatchDownloader, BatchRequest};
use crate::config::{Config, DownloadJob, JobList};
use crate::error::Result;
use crate::report;
use crate::types::{BatchReport, PackageId, StabilityTier};

/// Identifiers from a newline-delimited list, trimmed, blank lines dropped
///
/// A repeated identifier is kept once, at its first position.
pub fn parse_package_ids(content: &str) -> Vec<PackageId> {
    let mut seen = HashSet::new();
    content
        .lines()
        .filter_map(PackageId::parse)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Read an identifier list from disk
///
/// # Errors
///
/// Returns [`Error::Io`](crate::error::Error::Io) if the file cannot be read.
pub async fn read_package_ids(path: &Path) -> Result<Vec<PackageId>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_package_ids(&content))
}

/// Runs download jobs and writes their diagnostics
pub struct JobRunner {
    downloader: BatchDownloader,
    default_tier: StabilityTier,
}

impl JobRunner {
    /// Runner over the HTTP registry client and fetcher described by `config`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_downloader(
            BatchDownloader::new(config)?,
            config.download.minimum_tier,
        ))
    }

    /// Runner over an existing downloader
    pub fn with_downloader(downloader: BatchDownloader, default_tier: StabilityTier) -> Self {
        Self {
            downloader,
            default_tier,
        }
    }

    /// Run one job and write a diagnostic line for every failed package
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier list cannot be read (nothing is
    /// downloaded then) or diagnostics cannot be written.
    pub async fn run_job<W: Write>(&self, job: &DownloadJob, out: &mut W) -> Result<BatchReport> {
        let packages = read_package_ids(&job.source).await?;
        self.run_packages(job, &packages, out).await
    }

    /// Run every job in order
    ///
    /// A job whose identifier list cannot be read gets one diagnostic line and
    /// the remaining jobs still run. The returned vector holds one entry per job.
    ///
    /// # Errors
    ///
    /// Returns an error only if diagnostics cannot be written.
    pub async fn run_jobs<W: Write>(
        &self,
        jobs: &[DownloadJob],
        out: &mut W,
    ) -> Result<Vec<Option<BatchReport>>> {
        let mut reports = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.iter().enumerate() {
            info!(
                job = index + 1,
                of = jobs.len(),
                source = %job.source.display(),
                "running download job"
            );

            let packages = match read_package_ids(&job.source).await {
                Ok(packages) => packages,
                Err(err) => {
                    warn!(job = index + 1, error = %err, "skipping download job");
                    writeln!(out, "{}", report::id_list_diagnostic(&job.source, &err))?;
                    reports.push(None);
                    continue;
                }
            };

            let batch = self.run_packages(job, &packages, out).await?;
            info!(
                job = index + 1,
                succeeded = batch.succeeded(),
                failed = batch.failed(),
                "download job finished"
            );
            reports.push(Some(batch));
        }
        Ok(reports)
    }

    /// Run one job over an already read identifier list
    ///
    /// # Errors
    ///
    /// Returns an error only if diagnostics cannot be written.
    pub async fn run_packages<W: Write>(
        &self,
        job: &DownloadJob,
        packages: &[PackageId],
        out: &mut W,
    ) -> Result<BatchReport> {
        let request = BatchRequest::from_job(job, self.default_tier);
        let batch = self.downloader.run(packages, &request).await;
        report::write_diagnostics(out, &batch)?;
        Ok(batch)
    }

    /// Load a job list and run it
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`](crate::error::Error::ConfigParse) before any job runs if the list cannot
    /// be read or parsed.
    pub async fn run_job_file<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<Vec<Option<BatchReport>>> {
        let list = JobList::load(path)?;
        info!(path = %path.display(), jobs = list.jobs.len(), "loaded job list");
        self.run_jobs(&list.jobs, out).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parse_skips_blank_lines_and_trims() {
        let ids = parse_package_ids("sodium\n\n  lithium  \r\n\t\nfabric-api\n");
        let ids: Vec<_> = ids.iter().map(PackageId::as_str).collect();
        assert_eq!(ids, ["sodium", "lithium", "fabric-api"]);
    }

    #[test]
    fn parse_empty_list() {
        assert!(parse_package_ids("").is_empty());
        assert!(parse_package_ids("\n   \n").is_empty());
    }

    #[test]
    fn repeated_ids_keep_first_position() {
        let ids = parse_package_ids("a\na\nb\n  a \nc\nb\n");
        let ids: Vec<_> = ids.iter().map(PackageId::as_str).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn hash_is_not_a_comment() {
        let ids = parse_package_ids("# not a comment\n");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "# not a comment");
    }

    #[tokio::test]
    async fn read_missing_list_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_package_ids(&dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
