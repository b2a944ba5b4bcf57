//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (document | relational)
//!     → ListStore trait (find, find_by_id, count, paginate, create,
//!       update, delete, delete_many)
//!     → document.rs (JSON documents in a SQLite `documents` table)
//!     → relational.rs (SQLite `lists` table with fixed columns)
//!     → sqlite.rs (connection, blocking pool, `fold` search function)
//! ```
//!
//! # Design Decisions
//! - One capability interface, two adapters, chosen at startup
//! - Stores are long-lived and shared through `Arc<dyn ListStore>`
//! - Records cross the interface as JSON values so each backend keeps its
//!   own field naming (`_id` vs `id`)
//! - Not-found is never an error: empty results and zero counts

pub mod document;
pub mod relational;
pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use document::DocumentStore;
pub use relational::RelationalStore;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage driver failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("connection mutex poisoned")]
    Poisoned,
}

/// Field filters for list queries. Both present means AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact identifier match.
    pub id: Option<String>,
    /// Case-insensitive substring match on `text`.
    pub text: Option<String>,
}

impl ListFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.text.is_none()
    }
}

/// A skip/limit range over the natural record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// One page of records plus the total record count.
#[derive(Debug, Clone, Serialize)]
pub struct Paged {
    pub rows: Vec<Value>,
    pub count: u64,
}

/// Storage capability shared by both backends.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Short backend name for log fields.
    fn backend(&self) -> &'static str;

    /// Records matching `filter`, in natural order.
    async fn find(&self, filter: &ListFilter) -> StoreResult<Vec<Value>>;

    /// The record with identifier `id`, if any.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Value>>;

    /// Total record count.
    async fn count(&self) -> StoreResult<u64>;

    /// Records inside `window` plus the total count.
    async fn paginate(&self, window: Window) -> StoreResult<Paged>;

    /// Persist a new record built from `fields` and return it.
    async fn create(&self, fields: Map<String, Value>) -> StoreResult<Value>;

    /// Replace the given fields on the record `id`. Returns matched records.
    async fn update(&self, id: &str, changes: Map<String, Value>) -> StoreResult<u64>;

    /// Remove the record `id`. Returns removed records.
    async fn delete(&self, id: &str) -> StoreResult<u64>;

    /// Remove every record whose identifier is in `ids`. Returns removed records.
    async fn delete_many(&self, ids: &[String]) -> StoreResult<u64>;
}

/// Case folding applied to both stored text and search text.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Current time in the format both backends store timestamps in.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
