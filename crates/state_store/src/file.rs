use crate::{validate_key, KeyValueStore, StateError, StateResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const VALUE_EXTENSION: &str = "kv";

/// Stores each key in its own file under `root`.
///
/// File names are the blake3 digest of the key, so arbitrary key text is safe
/// on any filesystem. Writes go to a temporary sibling and are renamed into
/// place, which keeps a single-key write all-or-nothing.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = blake3::hash(key.as_bytes()).to_hex();
        self.root
            .join(format!("{}.{}", digest.as_str(), VALUE_EXTENSION))
    }

    async fn ensure_root(&self, key: &str) -> StateResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StateError::io(key, e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StateResult<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                debug!(key, path = %path.display(), len = value.len(), "file get");
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, path = %path.display(), "file get: absent");
                Ok(None)
            }
            Err(e) => Err(StateError::io(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StateResult<()> {
        validate_key(key)?;
        self.ensure_root(key).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));

        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| StateError::io(key, e))?;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StateError::io(key, e));
        }

        debug!(key, path = %path.display(), len = value.len(), "file set");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StateResult<()> {
        validate_key(key)?;
        let path = self.path_for(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, path = %path.display(), "file remove");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::io(key, e)),
        }
    }
}
