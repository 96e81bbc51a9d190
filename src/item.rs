//! Item identifiers, quantities, and the add-log entry.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed stock count. Negative values are representable (a pending
/// shortage); only [`remove`](crate::StockTable::remove) deletes entries that
/// drop to zero or below.
pub type Quantity = i64;

/// Key of a stock entry. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Validate and wrap an identifier. Empty strings are rejected with
    /// [`Error::InvalidItem`].
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidItem("must not be empty".into()));
        }
        Ok(Self(value))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ItemId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One line of the add log: when, how much, and which item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time of the add.
    pub at: DateTime<Local>,
    /// Item that was added to.
    pub item: ItemId,
    /// Delta that was applied (may be negative).
    pub quantity: Quantity,
}

impl LogEntry {
    pub(crate) fn now(item: ItemId, quantity: Quantity) -> Self {
        Self {
            at: Local::now(),
            item,
            quantity,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Added {} of {}",
            self.at.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.quantity,
            self.item
        )
    }
}
