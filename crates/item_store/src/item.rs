use crate::error::{ItemResult, ItemStoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Whether an item still needs buying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Done,
}

impl ItemStatus {
    /// Filter order shown to the user
    pub const ALL: [ItemStatus; 2] = [ItemStatus::Pending, ItemStatus::Done];

    pub fn toggled(self) -> Self {
        match self {
            ItemStatus::Pending => ItemStatus::Done,
            ItemStatus::Done => ItemStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Done => "done",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ItemStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "done" => Ok(ItemStatus::Done),
            other => Err(ItemStoreError::InvalidItem(format!(
                "unknown status '{}', expected 'pending' or 'done'",
                other
            ))),
        }
    }
}

/// One entry of the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub status: ItemStatus,
    pub description: String,
}

impl Item {
    /// New pending item with a freshly generated id
    pub fn new(description: impl Into<String>) -> ItemResult<Self> {
        Self::with_id(Uuid::new_v4().to_string(), ItemStatus::Pending, description)
    }

    pub fn with_id(
        id: impl Into<String>,
        status: ItemStatus,
        description: impl Into<String>,
    ) -> ItemResult<Self> {
        let item = Self {
            id: id.into(),
            status,
            description: description.into(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks the fields a stored item must have: a non-empty id and a
    /// description that is not blank.
    pub fn validate(&self) -> ItemResult<()> {
        if self.id.is_empty() {
            return Err(ItemStoreError::InvalidItem("id must not be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ItemStoreError::InvalidItem(
                "description must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == ItemStatus::Done
    }
}
