//! Human-readable diagnostics
//!
//! Every failure becomes one line on standard output starting with `ERR:`,
//! naming the package, the stage that failed and the cause.

use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, RequestError};
use crate::types::{BatchReport, Outcome, PackageReport};

/// Prefix shared by every diagnostic line
pub const DIAGNOSTIC_PREFIX: &str = "ERR:";

/// Diagnostic line for a failed package, `None` on success
pub fn package_diagnostic(report: &PackageReport) -> Option<String> {
    let id = &report.package;
    let line = match &report.outcome {
        Outcome::Selected { .. } => return None,
        Outcome::QueryFailed(RequestError::HttpStatus(code)) => format!(
            "received http code {code} while querying for latest version of \"{id}\""
        ),
        Outcome::QueryFailed(RequestError::Transport(cause)) => {
            format!("failed to load versions for \"{id}\": \"{cause}\"")
        }
        Outcome::NoMatchingVersion { minimum } => format!(
            "no version of \"{id}\" matches minimum stability tier \"{minimum}\""
        ),
        Outcome::ArtifactMissing(cause) => {
            format!("could not find primary file for \"{id}\": \"{cause}\"")
        }
        Outcome::DownloadFailed {
            info,
            cause: RequestError::HttpStatus(code),
        } => format!(
            "got http code {code} while requesting file \"{}\" for \"{id}\" from \"{}\"",
            info.filename, info.url
        ),
        Outcome::DownloadFailed {
            info,
            cause: RequestError::Transport(cause),
        } => format!(
            "failed to download file \"{}\" for \"{id}\" from \"{}\": \"{cause}\"",
            info.filename, info.url
        ),
    };
    Some(format!("{DIAGNOSTIC_PREFIX} {line}"))
}

/// Diagnostic lines for every failed package, in batch order
pub fn batch_diagnostics(report: &BatchReport) -> Vec<String> {
    report.packages.iter().filter_map(package_diagnostic).collect()
}

/// Write the batch's diagnostics, one per line
pub fn write_diagnostics<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    for line in batch_diagnostics(report) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Top-level diagnostic for a job list that could not be loaded
pub fn job_list_diagnostic(path: &Path, err: &Error) -> String {
    let reason = match err {
        Error::ConfigParse { reason, .. } => reason.clone(),
        other => other.to_string(),
    };
    format!(
        "{DIAGNOSTIC_PREFIX} failed to parse {}: \"{reason}\"",
        path.display()
    )
}

/// Diagnostic for a job whose identifier list could not be read
pub fn id_list_diagnostic(path: &Path, err: &Error) -> String {
    format!(
        "{DIAGNOSTIC_PREFIX} failed to read project id list {}: \"{err}\"",
        path.display()
    )
}
