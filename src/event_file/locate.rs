//! Locating event files within a run directory.
//!
//! Candidates are files whose names match `events*tfevents*`, searched both
//! directly under the run directory and under its `results` subdirectory.
//! Matches are ordered oldest-first by filesystem modification time, so
//! index 0 is the first run recorded into the directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::{Error, Result};

/// Filename shape written by TensorBoard summary writers,
/// e.g. `events.out.tfevents.1700000000.host`.
fn matches_event_file(name: &str) -> bool {
    name.strip_prefix("events")
        .is_some_and(|rest| rest.contains("tfevents"))
}

/// Collect matching files from one directory; a missing directory yields
/// no candidates.
fn candidates_in(dir: &Path, out: &mut Vec<(PathBuf, SystemTime)>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !matches_event_file(name) {
            continue;
        }
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            out.push((entry.path(), metadata.modified()?));
        }
    }
    Ok(())
}

/// Find all event files under `dir` and `dir/results`, oldest first.
///
/// # Errors
///
/// Returns [`Error::EventFileNotFound`] if neither location holds a match,
/// or [`Error::Io`] if a directory listing fails for a reason other than
/// the `results` subdirectory being absent.
pub fn find_event_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    candidates_in(dir, &mut candidates)?;
    candidates_in(&dir.join("results"), &mut candidates)?;

    if candidates.is_empty() {
        return Err(Error::EventFileNotFound {
            dir: dir.to_path_buf(),
        });
    }

    // Path as tie-break keeps the order deterministic for equal mtimes.
    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    debug!(dir = %dir.display(), count = candidates.len(), "located event files");
    Ok(candidates.into_iter().map(|(path, _)| path).collect())
}

/// Find the event file at `index` (0 = oldest) under `dir`.
///
/// # Errors
///
/// [`Error::EventFileNotFound`] if nothing matches;
/// [`Error::FileIndexOutOfRange`] if `index` exceeds the match count.
pub fn select_event_file(dir: &Path, index: usize) -> Result<PathBuf> {
    let mut files = find_event_files(dir)?;
    let count = files.len();
    if index >= count {
        return Err(Error::FileIndexOutOfRange { index, count });
    }
    Ok(files.swap_remove(index))
}
