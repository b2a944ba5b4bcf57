//! Relational table backend on SQLite.
//!
//! # Responsibilities
//! - Own one long-lived `rusqlite` connection for the process
//! - Create the `lists` table on open
//! - Translate list filters into parameterised SQL
//!
//! # Design Decisions
//! - Identifiers are integers; a non-integer id matches no row
//! - `updatedAt` is stored JSON-encoded so any JSON value written into it
//!   reads back unchanged; `createdAt` is a plain timestamp
//! - Text search is `LIKE` over `fold`ed text, so case folding covers
//!   non-ASCII letters while `%` and `_` keep their wildcard meaning

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::{json, Map, Value};

use super::sqlite::Database;
use super::{fold, timestamp, ListFilter, ListStore, Paged, StoreError, StoreResult, Window};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT,
    createdAt TEXT NOT NULL,
    updatedAt TEXT NOT NULL
)";

const COLUMNS: &str = "id, text, createdAt, updatedAt";

/// SQLite-backed list table.
#[derive(Clone)]
pub struct RelationalStore {
    db: Database,
}

impl RelationalStore {
    /// Open (or create) the database at `url`. `:memory:` opens a private
    /// in-memory database.
    pub fn open(url: &str) -> StoreResult<Self> {
        Ok(Self {
            db: Database::open(url, SCHEMA)?,
        })
    }
}

fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

/// JSON text for the `updatedAt` column.
fn encode_json(value: &Value) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

fn decode_json(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

/// Column value for `text`: strings as-is, other JSON as its text form.
fn text_column(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn row_to_json(row: &Row<'_>) -> rusqlite::Result<Value> {
    let id: i64 = row.get(0)?;
    let text: Option<String> = row.get(1)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(json!({
        "id": id,
        "text": text,
        "createdAt": created_at,
        "updatedAt": decode_json(updated_at),
    }))
}

fn select_where(conn: &Connection, clause: &str, args: Vec<SqlValue>) -> Result<Vec<Value>, StoreError> {
    let sql = format!("SELECT {COLUMNS} FROM lists{clause} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(args), row_to_json)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn count_rows(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?;
    Ok(count as u64)
}

#[async_trait]
impl ListStore for RelationalStore {
    fn backend(&self) -> &'static str {
        "relational"
    }

    async fn find(&self, filter: &ListFilter) -> StoreResult<Vec<Value>> {
        let mut conditions = Vec::new();
        let mut args = Vec::new();

        if let Some(id) = &filter.id {
            let Some(id) = parse_id(id) else {
                return Ok(Vec::new());
            };
            conditions.push("id IN (?)");
            args.push(SqlValue::Integer(id));
        }
        if let Some(text) = &filter.text {
            conditions.push("fold(text) LIKE '%' || ? || '%'");
            args.push(SqlValue::Text(fold(text)));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        self.db.call(move |conn| select_where(conn, &clause, args)).await
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Value>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        self.db.call(move |conn| {
            let mut rows = select_where(conn, " WHERE id = ?", vec![SqlValue::Integer(id)])?;
            Ok(rows.pop())
        })
        .await
    }

    async fn count(&self) -> StoreResult<u64> {
        self.db.call(|conn| count_rows(conn)).await
    }

    async fn paginate(&self, window: Window) -> StoreResult<Paged> {
        let limit = i64::try_from(window.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(window.offset).unwrap_or(i64::MAX);

        self.db.call(move |conn| {
            let count = count_rows(conn)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM lists ORDER BY id LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
                .query_map(params![limit, offset], row_to_json)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(Paged { rows, count })
        })
        .await
    }

    async fn create(&self, fields: Map<String, Value>) -> StoreResult<Value> {
        let text = text_column(fields.get("text"));
        let now = timestamp();
        let updated_at = encode_json(&Value::String(now.clone()))?;

        self.db.call(move |conn| {
            conn.execute(
                "INSERT INTO lists (text, createdAt, updatedAt) VALUES (?1, ?2, ?3)",
                params![text, now, updated_at],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                &format!("SELECT {COLUMNS} FROM lists WHERE id = ?1"),
                params![id],
                row_to_json,
            )?;
            Ok(row)
        })
        .await
    }

    async fn update(&self, id: &str, changes: Map<String, Value>) -> StoreResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };

        let mut assignments = Vec::new();
        let mut args = Vec::new();

        if changes.contains_key("text") {
            assignments.push("text = ?");
            args.push(match text_column(changes.get("text")) {
                Some(text) => SqlValue::Text(text),
                None => SqlValue::Null,
            });
        }

        let updated_at = match changes.get("updatedAt") {
            Some(value) => value.clone(),
            None => Value::String(timestamp()),
        };
        assignments.push("updatedAt = ?");
        args.push(SqlValue::Text(encode_json(&updated_at)?));
        args.push(SqlValue::Integer(id));

        let sql = format!("UPDATE lists SET {} WHERE id = ?", assignments.join(", "));
        self.db.call(move |conn| Ok(conn.execute(&sql, params_from_iter(args))? as u64))
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };
        self.db.call(move |conn| Ok(conn.execute("DELETE FROM lists WHERE id = ?1", params![id])? as u64))
            .await
    }

    async fn delete_many(&self, ids: &[String]) -> StoreResult<u64> {
        let ids: Vec<SqlValue> = ids
            .iter()
            .filter_map(|id| parse_id(id))
            .map(SqlValue::Integer)
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM lists WHERE id IN ({placeholders})");
        self.db.call(move |conn| Ok(conn.execute(&sql, params_from_iter(ids))? as u64))
            .await
    }
}
