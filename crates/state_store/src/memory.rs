use crate::{validate_key, KeyValueStore, StateResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Volatile store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    memory: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.memory.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.memory.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memory.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StateResult<Option<String>> {
        validate_key(key)?;
        let value = self.memory.read().await.get(key).cloned();
        debug!(key, found = value.is_some(), "memory get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StateResult<()> {
        validate_key(key)?;
        self.memory
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        debug!(key, len = value.len(), "memory set");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StateResult<()> {
        validate_key(key)?;
        let existed = self.memory.write().await.remove(key).is_some();
        debug!(key, existed, "memory remove");
        Ok(())
    }
}
