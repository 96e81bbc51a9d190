//! In-memory stock counter with JSON persistence.
//!
//! A [`StockTable`] maps item ids to signed quantities. Add and remove stock,
//! query it, list what is running low, and load/save the whole mapping as a
//! flat JSON object.
//!
//! ```rust,no_run
//! use stock_table::StockTable;
//!
//! let table = StockTable::new();
//! table.add("apple", 10).unwrap();
//! table.remove("apple", 3).unwrap();
//! assert_eq!(table.get_quantity("apple").unwrap(), 7);
//! table.save("inventory.json").unwrap();
//! ```
//!
//! Bind a table to a file with [`StockTable::open`] or
//! [`StockTable::builder`] to get [`flush`](StockTable::flush) and automatic
//! saves ([`SavePolicy`]).
//!
//! **Single-process only.** Two processes saving to the same file will
//! clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod autosave;
pub mod backend;
pub mod error;
pub mod item;
pub mod persist;
pub mod report;
pub mod serializer;
pub mod store;

pub use autosave::SavePolicy;
pub use backend::{StockBackend, Withdrawal};
pub use error::{Error, Result};
pub use item::{ItemId, LogEntry, Quantity};
pub use store::{
    StockTable, StockTableBuilder, StockTableHandle, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PATH,
};

/// Default backend: a read-write-locked `BTreeMap`, so reports and saved
/// files list items in sorted order.
pub type DefaultBackend =
    parking_lot::RwLock<std::collections::BTreeMap<ItemId, Quantity>>;
