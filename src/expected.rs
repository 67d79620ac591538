//! Loading golden metric expectations from JSON.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::HarnessConfig;
use crate::Result;

/// Load the golden expectations named by the configuration.
///
/// A configuration without an expectations path, or a path that does not
/// exist on disk, yields `Ok(None)`: an absent golden file means there is
/// nothing to compare against, which is the caller's call to treat as a
/// skip or a failure. The existence check runs before any open, so the
/// missing-file case never surfaces as a spurious IO error.
///
/// # Errors
///
/// Propagates [`Error::Io`](crate::Error::Io) for unreadable files and
/// [`Error::Json`](crate::Error::Json) for malformed contents; neither is
/// caught or reinterpreted.
pub fn load_expected_data(config: &HarnessConfig) -> Result<Option<Value>> {
    let Some(path) = config.expected_metrics_file.as_deref() else {
        warn!("no expected-metrics file configured");
        return Ok(None);
    };
    load_expected_file(path)
}

/// Load golden expectations from an explicit path. Same missing-file
/// semantics as [`load_expected_data`].
///
/// # Errors
///
/// See [`load_expected_data`].
pub fn load_expected_file(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        warn!(path = %path.display(), "expected-metrics file not found");
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), "loaded expected metrics");
    Ok(Some(value))
}
