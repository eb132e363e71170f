/*!
# Item Store

Owns the persisted shopping list. The whole collection lives as one JSON array
under a single key of a [`state_store::KeyValueStore`]; every operation reads
the full value, applies its change and writes the full value back.
*/

pub mod codec;
pub mod config;
pub mod error;
pub mod item;
pub mod store;

pub use config::StoreConfig;
pub use error::{ItemResult, ItemStoreError};
pub use item::{Item, ItemStatus};
pub use store::{ItemStore, StatusCounts};

/// Key the shopping list is persisted under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "@comprar:items";
