/*!
# State Store

Async string key-value store used as the durable backing for the item store.
Two implementations ship here: an in-memory map for tests and ephemeral
sessions, and a file-per-key store for on-device persistence.
*/

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Result type for state store operations
pub type StateResult<T> = Result<T, StateError>;

/// State store specific errors
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl StateError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}

/// Whole-value storage over string keys.
///
/// Every call either completes or fails; there is no partial write of a value.
/// Removing a key that does not exist is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> StateResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> StateResult<()>;

    /// Delete `key` entirely
    async fn remove(&self, key: &str) -> StateResult<()>;
}

pub(crate) fn validate_key(key: &str) -> StateResult<()> {
    if key.is_empty() {
        return Err(StateError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("@comprar:items").is_ok());
        assert!(matches!(validate_key(""), Err(StateError::InvalidKey(_))));
    }

    #[test]
    fn test_io_error_display_names_key() {
        let err = StateError::io(
            "k",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("'k'"));
        assert!(msg.contains("disk full"));
    }
}
