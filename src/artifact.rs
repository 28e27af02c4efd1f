//! Primary artifact lookup for a selected release

use std::path::{Component, Path};
use tracing::warn;

use crate::error::ArtifactError;
use crate::types::{DownloadInfo, ReleaseRecord};

/// Filename and URL of the file flagged primary in `record`
///
/// More than one primary file is a registry data anomaly: the first one in
/// registry order is used and the anomaly is logged.
///
/// # Errors
///
/// - [`ArtifactError::NoPrimary`] when no file is flagged primary
/// - [`ArtifactError::MissingField`] when the primary entry has no filename or url
/// - [`ArtifactError::UnsafeFilename`] when the filename is not a plain file name
pub fn locate_primary(record: &ReleaseRecord) -> Result<DownloadInfo, ArtifactError> {
    let mut primaries = record.files.iter().filter(|file| file.primary);

    let primary = primaries.next().ok_or_else(|| ArtifactError::NoPrimary {
        release: record.label().to_string(),
    })?;

    let extra = primaries.count();
    if extra > 0 {
        warn!(
            release = record.label(),
            primary_files = extra + 1,
            "release flags more than one primary file, using the first"
        );
    }

    let missing = |field| ArtifactError::MissingField {
        release: record.label().to_string(),
        field,
    };
    let filename = primary
        .filename
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| missing("filename"))?;
    let url = primary
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| missing("url"))?;

    if !is_plain_filename(filename) {
        return Err(ArtifactError::UnsafeFilename {
            release: record.label().to_string(),
            filename: filename.to_string(),
        });
    }

    Ok(DownloadInfo {
        filename: filename.to_string(),
        url: url.to_string(),
    })
}

/// Exactly one normal path component, no separators of either platform
fn is_plain_filename(filename: &str) -> bool {
    if filename.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
