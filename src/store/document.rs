//! Document collection backend.
//!
//! # Responsibilities
//! - Hold schemaless JSON documents keyed by a generated `_id`
//! - Stamp `createdAt` / `updatedAt` on writes
//! - Store documents in a SQLite `documents` table, in memory or on disk
//!
//! # Design Decisions
//! - Each document is one JSON text column; `_id` is duplicated into its
//!   own indexed column for lookups
//! - Natural order is insertion order (`seq`), which skip/limit relies on
//! - Text search is a case-insensitive substring match on string `text`
//! - Read-modify-write updates run inside a transaction, so a failed write
//!   leaves the stored document untouched

use std::path::Path;

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::sqlite::{Database, MEMORY};
use super::{fold, timestamp, ListFilter, ListStore, Paged, StoreError, StoreResult, Window};

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    _id TEXT NOT NULL UNIQUE,
    body TEXT NOT NULL
)";

type Document = Map<String, Value>;

/// Document collection stored as JSON rows.
#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Create an empty collection that lives only in memory.
    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self {
            db: Database::open(MEMORY, SCHEMA)?,
        })
    }

    /// Open the collection stored in the database file at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::open(&path.to_string_lossy(), SCHEMA)?;
        Ok(Self { db })
    }
}

fn decode(body: &str) -> Result<Value, StoreError> {
    let doc: Document = serde_json::from_str(body)?;
    Ok(Value::Object(doc))
}

fn select_bodies(
    conn: &Connection,
    clause: &str,
    args: Vec<SqlValue>,
) -> Result<Vec<Value>, StoreError> {
    query_bodies(conn, &format!("SELECT body FROM documents{clause} ORDER BY seq"), args)
}

fn query_bodies(conn: &Connection, sql: &str, args: Vec<SqlValue>) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let bodies = stmt
        .query_map(params_from_iter(args), |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    bodies.iter().map(|body| decode(body)).collect()
}

fn count_documents(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
    Ok(count as u64)
}

#[async_trait]
impl ListStore for DocumentStore {
    fn backend(&self) -> &'static str {
        "document"
    }

    async fn find(&self, filter: &ListFilter) -> StoreResult<Vec<Value>> {
        let mut conditions = Vec::new();
        let mut args = Vec::new();

        if let Some(id) = &filter.id {
            conditions.push("_id = ?");
            args.push(SqlValue::Text(id.clone()));
        }
        if let Some(text) = &filter.text {
            conditions.push("instr(fold(json_extract(body, '$.text')), ?) > 0");
            args.push(SqlValue::Text(fold(text)));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        self.db.call(move |conn| select_bodies(conn, &clause, args)).await
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Value>> {
        let id = id.to_string();
        self.db
            .call(move |conn| {
                let mut docs = select_bodies(conn, " WHERE _id = ?", vec![SqlValue::Text(id)])?;
                Ok(docs.pop())
            })
            .await
    }

    async fn count(&self) -> StoreResult<u64> {
        self.db.call(|conn| count_documents(conn)).await
    }

    async fn paginate(&self, window: Window) -> StoreResult<Paged> {
        let limit = i64::try_from(window.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(window.offset).unwrap_or(i64::MAX);

        self.db
            .call(move |conn| {
                let count = count_documents(conn)?;
                let rows = query_bodies(
                    conn,
                    "SELECT body FROM documents ORDER BY seq LIMIT ? OFFSET ?",
                    vec![SqlValue::Integer(limit), SqlValue::Integer(offset)],
                )?;
                Ok(Paged { rows, count })
            })
            .await
    }

    async fn create(&self, fields: Map<String, Value>) -> StoreResult<Value> {
        let now = timestamp();
        let id = Uuid::new_v4().simple().to_string();

        let mut doc = fields;
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        doc.insert("createdAt".to_string(), Value::String(now.clone()));
        doc.insert("updatedAt".to_string(), Value::String(now));
        let body = serde_json::to_string(&doc)?;

        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO documents (_id, body) VALUES (?1, ?2)",
                    params![id, body],
                )?;
                Ok(())
            })
            .await?;

        Ok(Value::Object(doc))
    }

    async fn update(&self, id: &str, changes: Map<String, Value>) -> StoreResult<u64> {
        let id = id.to_string();

        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                let body: Option<String> = tx
                    .query_row("SELECT body FROM documents WHERE _id = ?1", params![id], |row| {
                        row.get(0)
                    })
                    .optional()?;
                let Some(body) = body else {
                    return Ok(0);
                };

                let mut doc: Document = serde_json::from_str(&body)?;
                for (field, value) in changes {
                    if field == ID_FIELD || field == "createdAt" {
                        continue;
                    }
                    doc.insert(field, value);
                }
                doc.insert("updatedAt".to_string(), Value::String(timestamp()));

                tx.execute(
                    "UPDATE documents SET body = ?1 WHERE _id = ?2",
                    params![serde_json::to_string(&doc)?, id],
                )?;
                tx.commit()?;
                Ok(1)
            })
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<u64> {
        self.delete_many(&[id.to_string()]).await
    }

    async fn delete_many(&self, ids: &[String]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let args: Vec<SqlValue> = ids.iter().cloned().map(SqlValue::Text).collect();
        let placeholders = vec!["?"; args.len()].join(", ");
        let sql = format!("DELETE FROM documents WHERE _id IN ({placeholders})");

        self.db
            .call(move |conn| Ok(conn.execute(&sql, params_from_iter(args))? as u64))
            .await
    }
}
