//! Pluggable maps that hold the item → quantity association.
//!
//! Implement [`StockBackend`] to bring your own map. Everything takes `&self`,
//! so backends provide their own interior mutability.

use crate::error::{Error, Result};
use crate::item::{ItemId, Quantity};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// What happened when stock was taken out of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Withdrawal {
    /// Entry is still present with this quantity.
    Remaining(Quantity),
    /// Quantity reached zero or below and the entry was deleted.
    Depleted,
    /// There was no entry; nothing changed.
    Missing,
}

/// Map that a [`StockTable`](crate::StockTable) keeps its quantities in.
///
/// `deposit` and `withdraw` default to get-then-set, which leaves a small race
/// window with concurrent writers. Lock-based backends override them so the
/// read-modify-write happens under one write lock. Both fail with
/// [`Error::Overflow`] instead of wrapping or clamping, leaving the entry as
/// it was.
pub trait StockBackend: Send + Sync {
    /// Current quantity for `item`.
    fn get(&self, item: &ItemId) -> Option<Quantity>;

    /// Overwrite the quantity for `item`, returning the previous one.
    fn set(&self, item: ItemId, quantity: Quantity) -> Option<Quantity>;

    /// Delete the entry, returning its quantity if it existed.
    fn remove(&self, item: &ItemId) -> Option<Quantity>;

    /// Owned snapshot of every entry. Must not hold locks after returning.
    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (ItemId, Quantity)> + Send + '_>;

    /// Number of entries.
    fn map_len(&self) -> usize;

    /// `true` if `item` has an entry.
    fn contains(&self, item: &ItemId) -> bool {
        self.get(item).is_some()
    }

    /// Drop every entry.
    fn clear(&self) {
        let items: Vec<ItemId> = self.iter_snapshot().map(|(k, _)| k).collect();
        for item in &items {
            self.remove(item);
        }
    }

    /// Swap the whole mapping for `entries`.
    fn replace_all(&self, entries: Vec<(ItemId, Quantity)>) {
        self.clear();
        for (item, quantity) in entries {
            self.set(item, quantity);
        }
    }

    /// Add `delta` to the entry, creating it at `delta` when absent. No floor
    /// is applied. Returns the new quantity.
    fn deposit(&self, item: ItemId, delta: Quantity) -> Result<Quantity> {
        let next = checked_deposit(&item, self.get(&item).unwrap_or(0), delta)?;
        self.set(item, next);
        Ok(next)
    }

    /// Subtract `amount` from an existing entry and delete it once it reaches
    /// zero or below.
    fn withdraw(&self, item: &ItemId, amount: Quantity) -> Result<Withdrawal> {
        let Some(current) = self.get(item) else {
            return Ok(Withdrawal::Missing);
        };
        let outcome = checked_withdrawal(item, current, amount)?;
        match outcome {
            Withdrawal::Remaining(next) => {
                self.set(item.clone(), next);
            }
            _ => {
                self.remove(item);
            }
        }
        Ok(outcome)
    }
}

fn checked_deposit(item: &ItemId, current: Quantity, delta: Quantity) -> Result<Quantity> {
    current
        .checked_add(delta)
        .ok_or_else(|| Error::Overflow(item.to_string()))
}

// A subtraction that underflows past `i64::MIN` is still at or below zero, so
// it depletes the entry. Only a negative `amount` can push it past the top.
fn checked_withdrawal(item: &ItemId, current: Quantity, amount: Quantity) -> Result<Withdrawal> {
    match current.checked_sub(amount) {
        Some(next) if next > 0 => Ok(Withdrawal::Remaining(next)),
        Some(_) => Ok(Withdrawal::Depleted),
        None if amount > 0 => Ok(Withdrawal::Depleted),
        None => Err(Error::Overflow(item.to_string())),
    }
}

// ---- RwLock<BTreeMap> (default) ---------------------------------------------

impl StockBackend for RwLock<BTreeMap<ItemId, Quantity>> {
    fn get(&self, item: &ItemId) -> Option<Quantity> {
        self.read().get(item).copied()
    }

    fn set(&self, item: ItemId, quantity: Quantity) -> Option<Quantity> {
        self.write().insert(item, quantity)
    }

    fn remove(&self, item: &ItemId) -> Option<Quantity> {
        self.write().remove(item)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (ItemId, Quantity)> + Send + '_> {
        let snap: Vec<_> = self.read().iter().map(|(k, v)| (k.clone(), *v)).collect();
        Box::new(snap.into_iter())
    }

    fn map_len(&self) -> usize {
        self.read().len()
    }

    fn contains(&self, item: &ItemId) -> bool {
        self.read().contains_key(item)
    }

    fn clear(&self) {
        self.write().clear()
    }

    fn replace_all(&self, entries: Vec<(ItemId, Quantity)>) {
        *self.write() = entries.into_iter().collect();
    }

    fn deposit(&self, item: ItemId, delta: Quantity) -> Result<Quantity> {
        let mut map = self.write();
        match map.get_mut(&item) {
            Some(slot) => {
                *slot = checked_deposit(&item, *slot, delta)?;
                Ok(*slot)
            }
            None => {
                map.insert(item, delta);
                Ok(delta)
            }
        }
    }

    fn withdraw(&self, item: &ItemId, amount: Quantity) -> Result<Withdrawal> {
        let mut map = self.write();
        let Some(slot) = map.get_mut(item) else {
            return Ok(Withdrawal::Missing);
        };
        let outcome = checked_withdrawal(item, *slot, amount)?;
        match outcome {
            Withdrawal::Remaining(next) => *slot = next,
            _ => {
                map.remove(item);
            }
        }
        Ok(outcome)
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl StockBackend for RwLock<HashMap<ItemId, Quantity>> {
    fn get(&self, item: &ItemId) -> Option<Quantity> {
        self.read().get(item).copied()
    }

    fn set(&self, item: ItemId, quantity: Quantity) -> Option<Quantity> {
        self.write().insert(item, quantity)
    }

    fn remove(&self, item: &ItemId) -> Option<Quantity> {
        self.write().remove(item)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (ItemId, Quantity)> + Send + '_> {
        let snap: Vec<_> = self.read().iter().map(|(k, v)| (k.clone(), *v)).collect();
        Box::new(snap.into_iter())
    }

    fn map_len(&self) -> usize {
        self.read().len()
    }

    fn contains(&self, item: &ItemId) -> bool {
        self.read().contains_key(item)
    }

    fn clear(&self) {
        self.write().clear()
    }

    fn replace_all(&self, entries: Vec<(ItemId, Quantity)>) {
        *self.write() = entries.into_iter().collect();
    }

    fn deposit(&self, item: ItemId, delta: Quantity) -> Result<Quantity> {
        let mut map = self.write();
        match map.get_mut(&item) {
            Some(slot) => {
                *slot = checked_deposit(&item, *slot, delta)?;
                Ok(*slot)
            }
            None => {
                map.insert(item, delta);
                Ok(delta)
            }
        }
    }

    fn withdraw(&self, item: &ItemId, amount: Quantity) -> Result<Withdrawal> {
        let mut map = self.write();
        let Some(slot) = map.get_mut(item) else {
            return Ok(Withdrawal::Missing);
        };
        let outcome = checked_withdrawal(item, *slot, amount)?;
        match outcome {
            Withdrawal::Remaining(next) => *slot = next,
            _ => {
                map.remove(item);
            }
        }
        Ok(outcome)
    }
}

// ---- ShardMap ----------------------------------------------------------------

// ShardMap hands out `Arc<Quantity>`; deposit/withdraw use the trait defaults.
impl StockBackend for shardmap::ShardMap<ItemId, Quantity> {
    fn get(&self, item: &ItemId) -> Option<Quantity> {
        shardmap::ShardMap::get(self, item).map(|arc| *arc)
    }

    fn set(&self, item: ItemId, quantity: Quantity) -> Option<Quantity> {
        self.insert(item, quantity).map(|arc| *arc)
    }

    fn remove(&self, item: &ItemId) -> Option<Quantity> {
        shardmap::ShardMap::remove(self, item).map(|arc| *arc)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (ItemId, Quantity)> + Send + '_> {
        Box::new(shardmap::ShardMap::iter_snapshot(self).map(|(k, arc)| (k, *arc)))
    }

    fn map_len(&self) -> usize {
        self.len()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl StockBackend for dashmap::DashMap<ItemId, Quantity> {
    fn get(&self, item: &ItemId) -> Option<Quantity> {
        dashmap::DashMap::get(self, item).map(|r| *r.value())
    }

    fn set(&self, item: ItemId, quantity: Quantity) -> Option<Quantity> {
        self.insert(item, quantity)
    }

    fn remove(&self, item: &ItemId) -> Option<Quantity> {
        dashmap::DashMap::remove(self, item).map(|(_, v)| v)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (ItemId, Quantity)> + Send + '_> {
        let snap: Vec<_> = self.iter().map(|r| (r.key().clone(), *r.value())).collect();
        Box::new(snap.into_iter())
    }

    fn map_len(&self) -> usize {
        self.len()
    }

    fn contains(&self, item: &ItemId) -> bool {
        self.contains_key(item)
    }

    fn clear(&self) {
        dashmap::DashMap::clear(self)
    }

    fn deposit(&self, item: ItemId, delta: Quantity) -> Result<Quantity> {
        let mut slot = self.entry(item.clone()).or_insert(0);
        let next = checked_deposit(&item, *slot, delta)?;
        *slot = next;
        Ok(next)
    }

    fn withdraw(&self, item: &ItemId, amount: Quantity) -> Result<Withdrawal> {
        // Shard guard must be released before `remove_if` takes it again.
        let outcome = match self.get_mut(item) {
            Some(mut slot) => {
                let outcome = checked_withdrawal(item, *slot, amount)?;
                if let Withdrawal::Remaining(next) = outcome {
                    *slot = next;
                }
                outcome
            }
            None => return Ok(Withdrawal::Missing),
        };
        if outcome == Withdrawal::Depleted {
            dashmap::DashMap::remove(self, item);
        }
        Ok(outcome)
    }
}
