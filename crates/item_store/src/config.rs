use crate::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "COMPRAR_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "COMPRAR_STORAGE_KEY";
pub const ENV_SERIALIZE_MUTATIONS: &str = "COMPRAR_SERIALIZE_MUTATIONS";

/// Item store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Backing-store key holding the whole collection
    pub storage_key: String,
    /// Root directory for file-backed storage
    pub data_dir: PathBuf,
    /// Run mutating read-modify-write cycles one at a time
    pub serialize_mutations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());

        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(home).join(".comprar"),
            serialize_mutations: true,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `COMPRAR_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup(ENV_STORAGE_KEY).filter(|v| !v.trim().is_empty()) {
            config.storage_key = key;
        }
        if let Some(flag) = lookup(ENV_SERIALIZE_MUTATIONS) {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.serialize_mutations = true,
                "0" | "false" | "no" | "off" => config.serialize_mutations = false,
                other => tracing::warn!(
                    "Ignoring {}={}: expected true or false",
                    ENV_SERIALIZE_MUTATIONS,
                    other
                ),
            }
        }

        config
    }
}
