//! Encoding of the stock mapping. The on-disk shape is one flat JSON object:
//! `{ "<item>": <integer>, ... }`.
//!
//! [`StockTable`](crate::StockTable) always writes through [`JsonSerializer`].
//! The [`persist`](crate::persist) helpers take any [`Serializer`], so other
//! formats can be read and written outside a table.

use crate::error::{Error, Result};
use crate::item::{ItemId, Quantity};
use serde::ser::Serializer as _;
use std::collections::BTreeMap;

/// Converts stock snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode entries as one object, in the order given.
    fn serialize(&self, entries: &[(ItemId, Quantity)]) -> Result<Vec<u8>>;

    /// Decode bytes back into entries. Duplicate keys keep the last value.
    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<(ItemId, Quantity)>>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line).
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented JSON, easier to edit by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, entries: &[(ItemId, Quantity)]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(entries.len() * 16 + 2);
        let pairs = entries.iter().map(|(item, qty)| (item.as_str(), qty));
        let written = if self.pretty {
            let mut ser = serde_json::Serializer::pretty(&mut out);
            (&mut ser).collect_map(pairs)
        } else {
            let mut ser = serde_json::Serializer::new(&mut out);
            (&mut ser).collect_map(pairs)
        };
        written.map_err(|e| Error::Serialize(e.to_string()))?;
        Ok(out)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<(ItemId, Quantity)>> {
        let map: BTreeMap<ItemId, Quantity> = serde_json::from_slice(bytes)?;
        Ok(map.into_iter().collect())
    }
}
