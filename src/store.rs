//! Stock table, handle, and builder.

use crate::autosave::{nudge_channel, BackgroundSaver, SavePolicy};
use crate::backend::{StockBackend, Withdrawal};
use crate::error::{Error, Result};
use crate::item::{ItemId, LogEntry, Quantity};
use crate::persist::{atomic_write, read_entries, read_entries_or_empty};
use crate::report;
use crate::serializer::{JsonSerializer, Serializer};
use crate::DefaultBackend;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;
use tracing::{debug, warn};

/// Conventional file name for a persisted table.
pub const DEFAULT_PATH: &str = "inventory.json";

/// Threshold used by [`StockTable::low_stock`].
pub const DEFAULT_LOW_STOCK_THRESHOLD: Quantity = 5;

/// In-memory mapping from item id to quantity, with JSON persistence and
/// low-stock reporting.
///
/// [`new`](StockTable::new) gives an unbound table; use
/// [`load`](Self::load) / [`save`](Self::save) with explicit paths.
/// [`open`](StockTable::open) and [`builder`](StockTable::builder) bind the
/// table to a file so [`flush`](Self::flush) and the save policies work.
pub struct StockTable<M = DefaultBackend> {
    map: Arc<M>,
    path: Option<PathBuf>,
    serializer: JsonSerializer,
    policy: SavePolicy,
    nudge: Option<SyncSender<()>>,
}

impl StockTable {
    /// Empty, unbound table on the default backend.
    pub fn new() -> Self {
        Self::with_backend(DefaultBackend::default())
    }

    /// Open (or create) a table bound to `path` with manual saves and compact
    /// JSON. A missing or empty file gives an empty table.
    pub fn open(path: impl AsRef<Path>) -> Result<StockTableHandle> {
        Self::builder().path(path).build()
    }

    /// Start configuring a bound table on the default backend.
    pub fn builder() -> StockTableBuilder {
        StockTableBuilder::new()
    }
}

impl Default for StockTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: StockBackend> StockTable<M> {
    /// Empty, unbound table on a caller-supplied backend.
    pub fn with_backend(map: M) -> Self {
        Self {
            map: Arc::new(map),
            path: None,
            serializer: JsonSerializer::new(),
            policy: SavePolicy::Manual,
            nudge: None,
        }
    }

    // ---- mutations ----

    /// Add `quantity` (which may be negative) to `item`, creating the entry
    /// when it does not exist. No floor is applied on this path.
    ///
    /// An empty `item` is a no-op and returns `Ok(None)`. Otherwise the log
    /// line for the add is returned; keep it or drop it.
    ///
    /// [`Error::Overflow`] leaves the entry unchanged. [`Error::NotSaved`]
    /// means the add stands in memory but the save policy could not write it.
    pub fn add(&self, item: &str, quantity: Quantity) -> Result<Option<LogEntry>> {
        let entry = self.apply_add(item, quantity)?;
        if entry.is_some() {
            self.notify_mutation()?;
        }
        Ok(entry)
    }

    /// [`add`](Self::add), appending the rendered log line to `log`. The line
    /// is appended whenever the add was applied, even if saving it failed.
    pub fn add_logged(&self, item: &str, quantity: Quantity, log: &mut Vec<String>) -> Result<()> {
        if let Some(entry) = self.apply_add(item, quantity)? {
            log.push(entry.to_string());
            self.notify_mutation()?;
        }
        Ok(())
    }

    /// Subtract `quantity` from an existing entry, deleting it once it reaches
    /// zero or below.
    ///
    /// An unknown or empty `item` is not an error: nothing changes and
    /// [`Withdrawal::Missing`] comes back. Errors follow [`add`](Self::add).
    pub fn remove(&self, item: &str, quantity: Quantity) -> Result<Withdrawal> {
        let Ok(id) = ItemId::new(item) else {
            return Ok(Withdrawal::Missing);
        };
        let outcome = self.map.withdraw(&id, quantity)?;
        if outcome == Withdrawal::Missing {
            debug!(item = %id, quantity, "remove of unknown item ignored");
            return Ok(outcome);
        }
        debug!(item = %id, quantity, ?outcome, "removed stock");
        self.notify_mutation()?;
        Ok(outcome)
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<()> {
        self.map.clear();
        debug!("cleared stock table");
        self.notify_mutation()
    }

    // ---- reads ----

    /// Current quantity of `item`.
    ///
    /// Unlike [`remove`](Self::remove), an absent item is an error here:
    /// [`Error::NotFound`]. An empty id is [`Error::InvalidItem`].
    pub fn get_quantity(&self, item: &str) -> Result<Quantity> {
        let id = ItemId::new(item)?;
        self.map
            .get(&id)
            .ok_or_else(|| Error::NotFound(item.to_owned()))
    }

    /// `true` if `item` has an entry. Lets callers check before
    /// [`get_quantity`](Self::get_quantity).
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        ItemId::new(item).is_ok_and(|id| self.map.contains(&id))
    }

    /// Items whose quantity is strictly below `threshold`, in backend
    /// iteration order.
    #[must_use]
    pub fn list_below(&self, threshold: Quantity) -> Vec<ItemId> {
        self.map
            .iter_snapshot()
            .filter(|(_, quantity)| *quantity < threshold)
            .map(|(item, _)| item)
            .collect()
    }

    /// [`list_below`](Self::list_below) with [`DEFAULT_LOW_STOCK_THRESHOLD`].
    #[must_use]
    pub fn low_stock(&self) -> Vec<ItemId> {
        self.list_below(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.map_len()
    }

    /// `true` when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries.
    #[must_use]
    pub fn iter(&self) -> Vec<(ItemId, Quantity)> {
        self.map.iter_snapshot().collect()
    }

    /// Backing file, if the table is bound to one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Active save policy.
    #[must_use]
    pub fn policy(&self) -> &SavePolicy {
        &self.policy
    }

    // ---- reporting ----

    /// Print the report to stdout. A failed write is logged, not returned.
    pub fn report(&self) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = report::write_report(&mut out, self.map.iter_snapshot()) {
            warn!(error = %e, "failed to write stock report");
        }
    }

    /// Write the report to `out` instead of stdout.
    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        report::write_report(out, self.map.iter_snapshot()).map_err(Error::from)
    }

    // ---- persistence ----

    /// Replace the whole mapping with the JSON object in `path`.
    ///
    /// Fails when the file is missing or unreadable, is not valid JSON, or is
    /// not a flat object of non-empty keys to integers. On failure the table
    /// is left as it was.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let entries = read_entries(path, &self.serializer)?;
        let count = entries.len();
        self.map.replace_all(entries);
        debug!(path = %path.display(), entries = count, "loaded stock table");
        self.notify_mutation()
    }

    /// Write the whole mapping to `path` as one JSON object, replacing any
    /// existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_map(self.map.as_ref(), path.as_ref(), &self.serializer)
    }

    /// Save to the bound file. [`Error::Config`] if the table is unbound.
    pub fn flush(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::Config("table is not bound to a file".into()))?;
        self.save(path)
    }

    // ---- internal ----

    fn apply_add(&self, item: &str, quantity: Quantity) -> Result<Option<LogEntry>> {
        let Ok(id) = ItemId::new(item) else {
            debug!("ignoring add with empty item id");
            return Ok(None);
        };
        let total = self.map.deposit(id.clone(), quantity)?;
        debug!(item = %id, quantity, total, "added stock");
        Ok(Some(LogEntry::now(id, quantity)))
    }

    // The mutation has already happened; a failed write must not look like a
    // rejected one.
    fn notify_mutation(&self) -> Result<()> {
        match &self.policy {
            SavePolicy::Immediate => self
                .flush()
                .map_err(|e| Error::NotSaved(e.to_string())),
            SavePolicy::Background(_) => {
                if let Some(tx) = &self.nudge {
                    let _ = tx.try_send(());
                }
                Ok(())
            }
            SavePolicy::Manual => Ok(()),
        }
    }
}

impl<M: StockBackend> std::fmt::Debug for StockTable<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTable")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn save_map<M>(map: &M, path: &Path, serializer: &JsonSerializer) -> Result<()>
where
    M: StockBackend + ?Sized,
{
    let entries: Vec<_> = map.iter_snapshot().collect();
    let bytes = serializer.serialize(&entries)?;
    atomic_write(path, &bytes)?;
    debug!(path = %path.display(), entries = entries.len(), "saved stock table");
    Ok(())
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`StockTable`] bound to a file.
///
/// ```rust,no_run
/// use stock_table::{SavePolicy, StockTable};
///
/// let table = StockTable::builder()
///     .path("inventory.json")
///     .pretty(true)
///     .policy(SavePolicy::Immediate)
///     .build()
///     .unwrap();
/// table.add("apple", 10).unwrap();
/// ```
pub struct StockTableBuilder<M = DefaultBackend> {
    path: Option<PathBuf>,
    policy: SavePolicy,
    pretty: bool,
    _marker: PhantomData<M>,
}

impl<M> StockTableBuilder<M>
where
    M: StockBackend + Default + 'static,
{
    /// Builder for any backend, e.g.
    /// `StockTableBuilder::<ShardMap<ItemId, Quantity>>::new()`.
    pub fn new() -> Self {
        Self {
            path: None,
            policy: SavePolicy::Manual,
            pretty: false,
            _marker: PhantomData,
        }
    }

    /// Backing file. Required for any policy other than manual.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the save policy (default: [`SavePolicy::Manual`]).
    pub fn policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write indented JSON (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Load the backing file, if any, and return a handle.
    pub fn build(self) -> Result<StockTableHandle<M>> {
        if self.policy.is_automatic() && self.path.is_none() {
            return Err(Error::Config(format!(
                "{:?} save policy needs a backing file",
                self.policy
            )));
        }
        if self.policy == SavePolicy::Background(std::time::Duration::ZERO) {
            return Err(Error::Config("background save interval must be non-zero".into()));
        }

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let map = Arc::new(M::default());
        if let Some(path) = &self.path {
            let entries = read_entries_or_empty(path, &serializer)?;
            debug!(path = %path.display(), entries = entries.len(), "opened stock table");
            map.replace_all(entries);
        }

        let (worker, nudge) = match (&self.policy, &self.path) {
            (SavePolicy::Background(interval), Some(path)) => {
                let (tx, rx) = nudge_channel();
                let map_ref = Arc::clone(&map);
                let path = path.clone();
                let ser = serializer.clone();
                let worker = BackgroundSaver::spawn(
                    *interval,
                    move || {
                        if let Err(e) = save_map(map_ref.as_ref(), &path, &ser) {
                            warn!(path = %path.display(), error = %e, "background save failed");
                        }
                    },
                    rx,
                );
                (Some(worker), Some(tx))
            }
            _ => (None, None),
        };

        let table = StockTable {
            map,
            path: self.path,
            serializer,
            policy: self.policy,
            nudge,
        };

        Ok(StockTableHandle {
            inner: table,
            worker,
        })
    }
}

impl<M> Default for StockTableBuilder<M>
where
    M: StockBackend + Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for StockTableBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTableBuilder")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .field("pretty", &self.pretty)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owns a bound table and, for [`SavePolicy::Background`], its save thread.
///
/// Derefs to [`StockTable`]. Dropping it stops the thread after one final
/// save, which blocks for as long as that write takes.
pub struct StockTableHandle<M = DefaultBackend> {
    // Declared before `worker`: dropping the table first disconnects the
    // nudge channel, which is what tells the worker to exit.
    pub(crate) inner: StockTable<M>,
    #[allow(dead_code)]
    pub(crate) worker: Option<BackgroundSaver>,
}

impl<M> std::ops::Deref for StockTableHandle<M> {
    type Target = StockTable<M>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<M: StockBackend> std::fmt::Debug for StockTableHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}
