pub mod corrections;
pub mod expressions;
pub mod patterns;
pub mod problems;
pub mod synonyms;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Failure persisting or parsing a knowledge-base file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a JSON state file, falling back to (and re-persisting) the in-code
/// default when the file is missing or corrupt. Never fatal.
pub(crate) fn load_or_init<T>(path: &Path, default: impl FnOnce() -> T) -> T
where
    T: Serialize + DeserializeOwned,
{
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(value) => return value,
                Err(e) => warn!("corrupt state file {}, using defaults: {e}", path.display()),
            },
            Err(e) => warn!("unreadable state file {}, using defaults: {e}", path.display()),
        }
    }

    let value = default();
    if let Err(e) = persist(path, &value) {
        warn!("failed to seed state file {}: {e}", path.display());
    }
    value
}

/// Write a JSON state file wholesale. Single-process deployment: there is
/// no file locking, concurrent writers race.
pub(crate) fn persist<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
