//! Core types for modrinth-dl

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ArtifactError, Error, RequestError};

/// Maturity classification of a release
///
/// Ordering means "at least as stable as" and is decided by [`rank`](Self::rank),
/// never by the string id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StabilityTier {
    /// Unrecognised `version_type` reported by the registry (rank 0)
    Unknown = 0,
    /// Accept anything the registry recognises (rank 1)
    #[default]
    Any = 1,
    /// Alpha release (rank 2)
    Alpha = 2,
    /// Beta release (rank 3)
    Beta = 3,
    /// Stable release (rank 4)
    Release = 4,
}

impl StabilityTier {
    /// Tiers that have a registry wire id
    pub const WIRE_TIERS: [StabilityTier; 3] = [
        StabilityTier::Alpha,
        StabilityTier::Beta,
        StabilityTier::Release,
    ];

    /// Integer rank used for every comparison
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether this tier satisfies `minimum`
    pub fn is_at_least(self, minimum: StabilityTier) -> bool {
        self.rank() >= minimum.rank()
    }

    /// Registry `version_type` id, only defined for alpha, beta and release
    pub fn wire_id(self) -> Option<&'static str> {
        match self {
            StabilityTier::Alpha => Some("alpha"),
            StabilityTier::Beta => Some("beta"),
            StabilityTier::Release => Some("release"),
            StabilityTier::Unknown | StabilityTier::Any => None,
        }
    }

    /// Inverse of [`wire_id`](Self::wire_id)
    pub fn from_wire_id(id: &str) -> Option<Self> {
        Self::WIRE_TIERS
            .into_iter()
            .find(|tier| tier.wire_id() == Some(id))
    }

    /// Name used in configuration and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            StabilityTier::Unknown => "unknown",
            StabilityTier::Any => "any",
            other => other.wire_id().unwrap_or("unknown"),
        }
    }
}

impl PartialOrd for StabilityTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StabilityTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for StabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a minimum tier as written by a user: `any` or one of the wire ids.
/// `unknown` is not accepted, it only describes registry data.
impl FromStr for StabilityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        if id == "any" {
            return Ok(StabilityTier::Any);
        }
        Self::from_wire_id(&id).ok_or_else(|| Error::UnknownStabilityTier(s.to_string()))
    }
}

impl Serialize for StabilityTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StabilityTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Registry `version_type` ids outside the known set map to [`StabilityTier::Unknown`]
fn deserialize_wire_tier<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<StabilityTier, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(StabilityTier::from_wire_id(&s).unwrap_or(StabilityTier::Unknown))
}

/// Publish instants with an offset are converted to UTC; instants without one
/// are taken as UTC.
fn deserialize_publish_instant<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(&s) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid date_published {s:?}: {e}")))
}

/// Runtime or packaging format a release targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    /// Fabric mod loader
    Fabric,
    /// Vanilla data pack
    Datapack,
    /// Quilt mod loader
    Quilt,
    /// Forge mod loader
    Forge,
    /// NeoForge mod loader
    NeoForge,
}

impl Loader {
    /// Every supported loader
    pub const ALL: [Loader; 5] = [
        Loader::Fabric,
        Loader::Datapack,
        Loader::Quilt,
        Loader::Forge,
        Loader::NeoForge,
    ];

    /// Wire id used in registry filters and job lists
    pub fn as_str(self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Datapack => "datapack",
            Loader::Quilt => "quilt",
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Loader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|loader| loader.as_str() == s)
            .ok_or_else(|| Error::UnknownLoader(s.to_string()))
    }
}

/// One file attached to a release
///
/// `filename` and `url` are optional so that one malformed entry only
/// affects the release it belongs to, not the whole registry response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name as published
    #[serde(default)]
    pub filename: Option<String>,
    /// Direct download URL
    #[serde(default)]
    pub url: Option<String>,
    /// Whether this is the canonical artifact of the release
    #[serde(default)]
    pub primary: bool,
}

/// One published version of a project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Registry id of the version
    #[serde(default)]
    pub id: Option<String>,
    /// Human-facing version number
    #[serde(default)]
    pub version_number: Option<String>,
    /// Stability tier
    #[serde(deserialize_with = "deserialize_wire_tier")]
    pub version_type: StabilityTier,
    /// Publish instant
    #[serde(deserialize_with = "deserialize_publish_instant")]
    pub date_published: DateTime<Utc>,
    /// Attached files in registry order
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl ReleaseRecord {
    /// Best available label for logs: version number, then id
    pub fn label(&self) -> &str {
        self.version_number
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// Registry-assigned project identifier (slug or id)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Trim the input and reject it when nothing is left
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Location of a release's primary artifact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadInfo {
    /// File name to write under the destination directory
    pub filename: String,
    /// URL to fetch the artifact from
    pub url: String,
}

/// Pipeline stage a package passes through
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Registry version listing
    Query,
    /// Stability filter and timestamp ranking
    Select,
    /// Primary file lookup
    Locate,
    /// Artifact download
    Fetch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Query => "query",
            Stage::Select => "select",
            Stage::Locate => "locate",
            Stage::Fetch => "fetch",
        })
    }
}

/// Result of running one package through the pipeline
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Release selected and its primary artifact written to `path`
    Selected {
        /// The fetched artifact
        info: DownloadInfo,
        /// Where the artifact was written
        path: PathBuf,
    },
    /// Registry query failed
    QueryFailed(RequestError),
    /// No release satisfied the minimum tier
    NoMatchingVersion {
        /// Tier that was requested
        minimum: StabilityTier,
    },
    /// Selected release has no usable primary file
    ArtifactMissing(ArtifactError),
    /// Artifact download failed
    DownloadFailed {
        /// The artifact that was being fetched
        info: DownloadInfo,
        /// Why the fetch failed
        cause: RequestError,
    },
}

impl Outcome {
    /// Whether the artifact ended up on disk
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Selected { .. })
    }

    /// Stage that produced a failure, `None` on success
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Outcome::Selected { .. } => None,
            Outcome::QueryFailed(_) => Some(Stage::Query),
            Outcome::NoMatchingVersion { .. } => Some(Stage::Select),
            Outcome::ArtifactMissing(_) => Some(Stage::Locate),
            Outcome::DownloadFailed { .. } => Some(Stage::Fetch),
        }
    }
}

/// Outcome for one package, tagged with its identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageReport {
    /// The package this report is about
    pub package: PackageId,
    /// What happened to it
    pub outcome: Outcome,
}

/// Per-package outcomes of one batch, in input order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One entry per input package
    pub packages: Vec<PackageReport>,
}

impl BatchReport {
    /// Number of packages whose artifact was written
    pub fn succeeded(&self) -> usize {
        self.packages
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Number of packages that failed at any stage
    pub fn failed(&self) -> usize {
        self.packages.len() - self.succeeded()
    }

    /// Outcome for `package`, if it was part of the batch
    pub fn outcome_for(&self, package: &str) -> Option<&Outcome> {
        self.packages
            .iter()
            .find(|r| r.package.as_str() == package)
            .map(|r| &r.outcome)
    }
}
