use state_store::StateError;

/// Result type for item store operations
pub type ItemResult<T> = Result<T, ItemStoreError>;

/// Item store errors. Each storage variant names the phase that failed and
/// keeps the backing store's error as its source.
#[derive(Debug, thiserror::Error)]
pub enum ItemStoreError {
    #[error("ITEMS_GET: {0}")]
    Read(#[source] StateError),
    #[error("ITEMS_SAVE: {0}")]
    Write(#[source] StateError),
    #[error("ITEMS_CLEAR: {0}")]
    Clear(#[source] StateError),
    #[error("ITEMS_GET: malformed value under '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("ITEMS_GET: invalid item at index {index} under '{key}': {reason}")]
    Corrupt {
        key: String,
        index: usize,
        reason: String,
    },
    #[error("ITEMS_SAVE: failed to encode items: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
}

impl ItemStoreError {
    /// True for failures that originate in the backing store
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_) | Self::Clear(_))
    }
}
