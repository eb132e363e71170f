use crate::codec;
use crate::config::StoreConfig;
use crate::error::{ItemResult, ItemStoreError};
use crate::item::{Item, ItemStatus};
use state_store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Number of items per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Pending => self.pending,
            ItemStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.done
    }
}

/// Sole reader and writer of the persisted item collection.
///
/// Holds no item state between calls: every operation starts from a fresh read
/// of the backing store. With mutation serialization on (the default), the
/// read-modify-write cycles of `add`, `remove`, `toggle_status` and `clear`
/// on one instance run one at a time, so overlapping calls cannot drop each
/// other's updates. Separate instances over the same key are not coordinated.
pub struct ItemStore<S: KeyValueStore + ?Sized> {
    backing: Arc<S>,
    storage_key: String,
    mutation_lock: Option<Mutex<()>>,
}

impl<S: KeyValueStore + ?Sized> ItemStore<S> {
    pub fn new(backing: Arc<S>, storage_key: impl Into<String>) -> Self {
        Self {
            backing,
            storage_key: storage_key.into(),
            mutation_lock: Some(Mutex::new(())),
        }
    }

    pub fn from_config(backing: Arc<S>, config: &StoreConfig) -> Self {
        Self::new(backing, config.storage_key.clone())
            .with_serialized_mutations(config.serialize_mutations)
    }

    /// Turn the per-instance mutation lock on or off
    pub fn with_serialized_mutations(mut self, enabled: bool) -> Self {
        self.mutation_lock = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// All items in insertion order. An absent key is an empty list.
    pub async fn get(&self) -> ItemResult<Vec<Item>> {
        let raw = self.backing.get(&self.storage_key).await.map_err(|e| {
            error!("Failed to read items from '{}': {}", self.storage_key, e);
            ItemStoreError::Read(e)
        })?;

        let items = match raw {
            Some(raw) => codec::decode(&self.storage_key, &raw).map_err(|e| {
                error!("Stored items under '{}' are malformed: {}", self.storage_key, e);
                e
            })?,
            None => Vec::new(),
        };

        debug!(key = %self.storage_key, count = items.len(), "Loaded items");
        Ok(items)
    }

    /// Items with the given status, in their original relative order
    pub async fn get_by_status(&self, status: ItemStatus) -> ItemResult<Vec<Item>> {
        let items = self.get().await?;
        Ok(items.into_iter().filter(|item| item.status == status).collect())
    }

    /// Append `item` and return the updated list.
    ///
    /// The caller supplies the id; duplicates are not checked.
    pub async fn add(&self, item: Item) -> ItemResult<Vec<Item>> {
        item.validate()?;

        let _guard = self.lock_mutations().await;
        let mut items = self.get().await?;
        let id = item.id.clone();
        items.push(item);
        self.save(&items).await?;

        info!(id = %id, count = items.len(), "Added item");
        Ok(items)
    }

    /// Drop every item with this id. Unknown ids are not an error.
    pub async fn remove(&self, id: &str) -> ItemResult<()> {
        let _guard = self.lock_mutations().await;
        let mut items = self.get().await?;
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() == before {
            warn!(id, "Remove matched no item");
        }

        self.save(&items).await?;
        info!(id, count = items.len(), "Removed item");
        Ok(())
    }

    /// Flip pending/done for the item with this id. Unknown ids are not an error.
    pub async fn toggle_status(&self, id: &str) -> ItemResult<()> {
        let _guard = self.lock_mutations().await;
        let mut items = self.get().await?;

        let mut matched = false;
        for item in items.iter_mut().filter(|item| item.id == id) {
            item.status = item.status.toggled();
            matched = true;
        }

        if !matched {
            warn!(id, "Toggle matched no item");
        }

        self.save(&items).await?;
        info!(id, matched, "Toggled item status");
        Ok(())
    }

    /// Delete the backing key outright rather than storing an empty list
    pub async fn clear(&self) -> ItemResult<()> {
        let _guard = self.lock_mutations().await;
        self.backing.remove(&self.storage_key).await.map_err(|e| {
            error!("Failed to clear items under '{}': {}", self.storage_key, e);
            ItemStoreError::Clear(e)
        })?;

        info!(key = %self.storage_key, "Cleared items");
        Ok(())
    }

    pub async fn count_by_status(&self) -> ItemResult<StatusCounts> {
        let items = self.get().await?;
        let done = items.iter().filter(|item| item.is_done()).count();
        Ok(StatusCounts {
            pending: items.len() - done,
            done,
        })
    }

    /// First item with this id
    pub async fn find(&self, id: &str) -> ItemResult<Option<Item>> {
        let items = self.get().await?;
        Ok(items.into_iter().find(|item| item.id == id))
    }

    async fn save(&self, items: &[Item]) -> ItemResult<()> {
        let encoded = codec::encode(items)?;
        self.backing
            .set(&self.storage_key, &encoded)
            .await
            .map_err(|e| {
                error!("Failed to save items under '{}': {}", self.storage_key, e);
                ItemStoreError::Write(e)
            })
    }

    async fn lock_mutations(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.mutation_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use state_store::MemoryStore;

    fn store() -> (Arc<MemoryStore>, ItemStore<MemoryStore>) {
        let backing = Arc::new(MemoryStore::new());
        let store = ItemStore::new(backing.clone(), "@comprar:items");
        (backing, store)
    }

    #[tokio::test]
    async fn test_add_persists_wire_format() {
        let (backing, store) = store();

        let item = Item::with_id("1", ItemStatus::Pending, "milk").unwrap();
        let items = store.add(item).await.unwrap();
        assert_eq!(items.len(), 1);

        let raw = backing.get("@comprar:items").await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":"1","status":"pending","description":"milk"}]"#);
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let (backing, store) = store();
        store.add(Item::new("bread").unwrap()).await.unwrap();

        store.clear().await.unwrap();
        assert!(!backing.contains_key("@comprar:items").await);
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_still_writes() {
        let (backing, store) = store();
        assert!(!backing.contains_key("@comprar:items").await);

        store.remove("missing").await.unwrap();
        assert_eq!(
            backing.get("@comprar:items").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_item_without_writing() {
        let (backing, store) = store();
        let item = Item {
            id: "1".to_string(),
            status: ItemStatus::Pending,
            description: " ".to_string(),
        };

        assert!(matches!(
            store.add(item).await,
            Err(ItemStoreError::InvalidItem(_))
        ));
        assert!(backing.is_empty().await);
    }

    #[tokio::test]
    async fn test_counts_and_find() {
        let (_, store) = store();
        store.add(Item::with_id("1", ItemStatus::Pending, "a").unwrap()).await.unwrap();
        store.add(Item::with_id("2", ItemStatus::Done, "b").unwrap()).await.unwrap();
        store.add(Item::with_id("3", ItemStatus::Done, "c").unwrap()).await.unwrap();

        let counts = store.count_by_status().await.unwrap();
        assert_eq!(counts, StatusCounts { pending: 1, done: 2 });
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(ItemStatus::Done), 2);

        assert_eq!(store.find("2").await.unwrap().unwrap().description, "b");
        assert!(store.find("9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_key() {
        let backing = Arc::new(MemoryStore::new());
        let config = StoreConfig {
            storage_key: "@other:items".to_string(),
            serialize_mutations: false,
            ..StoreConfig::default()
        };
        let store = ItemStore::from_config(backing.clone(), &config);
        assert_eq!(store.storage_key(), "@other:items");

        store.add(Item::new("x").unwrap()).await.unwrap();
        assert!(backing.contains_key("@other:items").await);
        assert!(!backing.contains_key("@comprar:items").await);
    }
}
