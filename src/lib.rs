//! # modrinth-dl
//!
//! Resolves and downloads the latest compatible release of each project in a
//! list from the Modrinth registry.
//!
//! For every project the registry is asked for all releases matching a game
//! version and a loader. The newest release at least as stable as the
//! requested tier is selected, and its primary file is downloaded into the
//! destination directory. One project's failure never stops the others: each
//! gets its own [`Outcome`] and failures are rendered as `ERR:` lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use modrinth_dl::{BatchDownloader, BatchRequest, Config, Loader, PackageId, StabilityTier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = BatchDownloader::new(&Config::default())?;
//!
//!     let packages: Vec<PackageId> = ["sodium", "lithium"]
//!         .iter()
//!         .filter_map(|id| PackageId::parse(id))
//!         .collect();
//!     let request = BatchRequest {
//!         platform_version: "1.20.1".to_string(),
//!         loader: Loader::Fabric,
//!         minimum_tier: StabilityTier::Release,
//!         destination: "mods".into(),
//!     };
//!
//!     let report = downloader.run(&packages, &request).await;
//!     for line in modrinth_dl::report::batch_diagnostics(&report) {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Primary artifact lookup
pub mod artifact;
/// Two-phase batch orchestration
pub mod batch;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Artifact fetching
pub mod fetcher;
/// Job-list driver and identifier lists
pub mod jobs;
/// Registry query client
pub mod registry;
/// Diagnostic rendering
pub mod report;
/// Version selection
pub mod selector;
/// Core types
pub mod types;

// Re-export commonly used types
pub use artifact::locate_primary;
pub use batch::{BatchDownloader, BatchRequest};
pub use config::{Config, DownloadConfig, DownloadJob, JobList, RegistryConfig};
pub use error::{ArtifactError, Error, RequestError, Result};
pub use fetcher::{ArtifactFetcher, HttpFetcher};
pub use jobs::{JobRunner, parse_package_ids, read_package_ids};
pub use registry::{RegistryClient, ReleaseSource};
pub use selector::{select_latest, take_latest};
pub use types::{
    BatchReport, DownloadInfo, FileRecord, Loader, Outcome, PackageId, PackageReport,
    ReleaseRecord, StabilityTier, Stage,
};
