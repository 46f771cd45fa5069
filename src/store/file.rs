//! On-disk store: one file per key under a data directory.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{KeyValueStore, StoreError};

const EXTENSION: &str = "json";

/// A [`KeyValueStore`] that keeps each key in `<data_dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the file path backing `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

/// Keys become file names, so they are limited to a portable character set.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path(key)?;

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        let write_err = |source: io::Error| StoreError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.data_dir).await.map_err(write_err)?;

        let tmp = self.data_dir.join(format!(".{}.{}.tmp", key, EXTENSION));
        fs::write(&tmp, value).await.map_err(write_err)?;
        fs::rename(&tmp, &path).await.map_err(write_err)?;

        tracing::trace!(key, path = %path.display(), bytes = value.len(), "wrote value");
        Ok(())
    }
}
