//! Shared SQLite connection handling.
//!
//! # Responsibilities
//! - Open file or in-memory databases and apply a schema
//! - Register the `fold` SQL function used for text search
//! - Run queries on the blocking pool
//!
//! # Design Decisions
//! - One connection per store, serialised behind a mutex
//! - `fold` is the same Unicode lowercase mapping the Rust side applies to
//!   search text, so both sides of a comparison fold identically

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use super::{fold, StoreError, StoreResult};

/// Location string that selects a private in-memory database.
pub const MEMORY: &str = ":memory:";

/// A long-lived SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open `location` (a file path, or [`MEMORY`]) and apply `schema`.
    pub fn open(location: &str, schema: &str) -> StoreResult<Self> {
        let conn = if location == MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(location))?
        };
        register_functions(&conn)?;
        conn.execute_batch(schema)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await?
    }
}

/// `fold(x)`: lowercase text, `NULL` for anything that is not text.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            Ok(match ctx.get_raw(0) {
                ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().map(fold),
                _ => None,
            })
        },
    )
}
