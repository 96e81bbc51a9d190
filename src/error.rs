//! Unified error type for all table operations.

/// Things that can go wrong when using a stock table.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (missing file, permissions, rename).
    Io(String),
    /// Failed to encode the stock mapping as JSON.
    Serialize(String),
    /// File contents are not a flat JSON object of item ids to integers.
    Deserialize(String),
    /// Bad configuration (autosave policy without a backing file, etc.).
    Config(String),
    /// The item has no entry in the table.
    NotFound(String),
    /// Item identifier rejected at the boundary (e.g. empty).
    InvalidItem(String),
    /// The change would take the item's quantity outside the `i64` range.
    /// The entry is left as it was.
    Overflow(String),
    /// The in-memory change was applied but the save policy failed to write
    /// the backing file. Do not retry the mutation; call `flush()` instead.
    NotSaved(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::NotFound(item) => write!(f, "item not found: {item:?}"),
            Error::InvalidItem(reason) => write!(f, "invalid item id: {reason}"),
            Error::Overflow(item) => write!(f, "quantity overflow for item {item:?}"),
            Error::NotSaved(msg) => write!(f, "change applied but not saved: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Io => Error::Io(err.to_string()),
            Category::Syntax | Category::Eof | Category::Data => {
                Error::Deserialize(err.to_string())
            }
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
