use crate::document::WhitelistDocument;
use crate::error::{MergeError, Result};
use crate::merge::merge_endpoints;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the primary file name for the pre-write copy.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Where the merged whitelist goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeTarget {
    /// Write the result to a new file, leaving both inputs untouched.
    NewFile(PathBuf),
    /// Overwrite the primary file, optionally copying it aside first.
    InPlace { backup: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
    /// File the result was written to, `None` on a dry run.
    pub written: Option<PathBuf>,
    pub backup: Option<PathBuf>,
}

/// Merges the first whitelist of `secondary` into the first whitelist of
/// `primary`, returning the updated primary document.
pub fn merge_documents(
    mut primary: WhitelistDocument,
    secondary: &WhitelistDocument,
) -> Result<(WhitelistDocument, MergeSummary)> {
    debug!(
        "Merging first whitelist of {} into {}",
        secondary.origin().display(),
        primary.origin().display()
    );
    let outcome = merge_endpoints(primary.endpoints()?, secondary.endpoints()?)?;
    let summary = MergeSummary {
        added: outcome.added,
        skipped: outcome.skipped,
        total: outcome.endpoints.len(),
        written: None,
        backup: None,
    };
    primary.replace_endpoints(outcome.endpoints)?;
    Ok((primary, summary))
}

/// Loads both files, merges them in memory and writes the result to `target`.
/// Nothing is written unless the merge itself succeeded. With `dry_run` the
/// merge is computed and reported but no file is touched.
pub fn merge_files(
    primary_path: &Path,
    secondary_path: &Path,
    target: &MergeTarget,
    dry_run: bool,
) -> Result<MergeSummary> {
    let primary = WhitelistDocument::load(primary_path)?;
    let secondary = WhitelistDocument::load(secondary_path)?;
    let (merged, mut summary) = merge_documents(primary, &secondary)?;

    info!(
        "Merging {} into {}: {} added, {} skipped, {} total",
        secondary_path.display(),
        primary_path.display(),
        summary.added,
        summary.skipped,
        summary.total
    );

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(summary);
    }

    match target {
        MergeTarget::NewFile(output_path) => {
            merged.save(output_path)?;
            summary.written = Some(output_path.clone());
        }
        MergeTarget::InPlace { backup } => {
            summary.backup =
                replace_with_backup(primary_path, *backup, |path| merged.save(path))?;
            summary.written = Some(primary_path.to_path_buf());
        }
    }

    Ok(summary)
}

/// `<path>.bak`, keeping the original extension in place.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

// The backup is taken before the primary is touched and is left behind if the
// write fails afterwards.
fn replace_with_backup<F>(path: &Path, backup: bool, write: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let backup = if backup {
        let copy = backup_path(path);
        fs::copy(path, &copy).map_err(|e| MergeError::io(&copy, e))?;
        info!("Backup of {} saved to {}", path.display(), copy.display());
        Some(copy)
    } else {
        None
    };

    write(path)?;
    Ok(backup)
}
