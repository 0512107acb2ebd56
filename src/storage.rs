//! Reading and writing source collections on disk.
//!
//! Collections are JSON arrays written pretty-printed with two-space indent;
//! non-ASCII text is kept literal. Writes are not transactional: callers back
//! up the previous file first, then overwrite it.

use crate::error::{CurateError, Result};
use crate::models::BookSource;
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Load a collection. Array elements that are not objects are skipped.
///
/// # Errors
///
/// - [`CurateError::MissingInput`] if the file does not exist
/// - [`CurateError::Io`] if it cannot be read
/// - [`CurateError::Parse`] if it is not a JSON array
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_sources(path: &Path) -> Result<Vec<BookSource>> {
    if !fs::try_exists(path)
        .await
        .map_err(|e| CurateError::io(path, e))?
    {
        return Err(CurateError::MissingInput(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| CurateError::io(path, e))?;
    let values: Vec<Value> = serde_json::from_str(&raw).map_err(|e| CurateError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let total = values.len();
    let sources: Vec<BookSource> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let source = BookSource::from_value(value);
            if source.is_none() {
                warn!(index, "Skipping array element that is not an object");
            }
            source
        })
        .collect();

    info!(count = sources.len(), skipped = total - sources.len(), "Loaded sources");
    Ok(sources)
}

/// Serialize `value` as pretty JSON and write it to `path`, creating parent
/// directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    ensure_parent_dir(path).await?;
    fs::write(path, json)
        .await
        .map_err(|e| CurateError::io(path, e))?;
    info!("Wrote JSON");
    Ok(())
}

/// Copy `from` to `to` if `from` exists. Returns whether a copy was made.
#[instrument(level = "info", skip_all, fields(from = %from.display(), to = %to.display()))]
pub async fn backup_file(from: &Path, to: &Path) -> Result<bool> {
    if !fs::try_exists(from)
        .await
        .map_err(|e| CurateError::io(from, e))?
    {
        return Ok(false);
    }
    ensure_parent_dir(to).await?;
    fs::copy(from, to)
        .await
        .map_err(|e| CurateError::io(to, e))?;
    info!("Backup created");
    Ok(true)
}
