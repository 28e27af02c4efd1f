//! Error types for modrinth-dl
//!
//! Two layers of errors live here:
//! - [`Error`] covers everything that can stop a whole run (configuration,
//!   job-list parsing, reading identifier lists).
//! - [`RequestError`] is the per-request failure of a registry query or an
//!   artifact fetch. It never escapes a package boundary; the batch orchestrator
//!   folds it into an [`Outcome`](crate::types::Outcome) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modrinth-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for modrinth-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Job-list document could not be read or parsed
    #[error("failed to parse job list {}: {reason}", path.display())]
    ConfigParse {
        /// Path of the job-list document
        path: PathBuf,
        /// Underlying read or parse failure
        reason: String,
    },

    /// Loader identifier is not one of the known wire ids
    #[error("unknown loader \"{0}\"")]
    UnknownLoader(String),

    /// Stability tier identifier is not one of the known ids
    #[error("unknown stability tier \"{0}\"")]
    UnknownStabilityTier(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a configuration key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Failure of a single HTTP request against the registry or an artifact host
///
/// A request either succeeds, comes back with a non-200 status, or fails
/// somewhere below HTTP (connect, TLS, body read, JSON decode, disk write).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Server answered with a status other than 200
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// Transport, decode, or I/O fault, carrying the underlying cause
    #[error("{0}")]
    Transport(String),
}

impl RequestError {
    /// Status code for [`RequestError::HttpStatus`], `None` otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus(code) => Some(*code),
            RequestError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

/// Why a selected release has no usable primary artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// No file is flagged primary
    #[error("release {release} has no primary file")]
    NoPrimary {
        /// Label of the release
        release: String,
    },

    /// The primary entry lacks a required field
    #[error("primary file of release {release} is missing its {field}")]
    MissingField {
        /// Label of the release
        release: String,
        /// Name of the absent field ("filename" or "url")
        field: &'static str,
    },

    /// The primary filename would escape the destination directory
    #[error("primary file of release {release} has unsafe filename \"{filename}\"")]
    UnsafeFilename {
        /// Label of the release
        release: String,
        /// Filename as published
        filename: String,
    },
}
