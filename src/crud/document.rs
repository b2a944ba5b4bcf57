//! Document collection handlers.
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/` | `{data, message}` |
//! | GET | `/item/{id}` | `{data, message}` |
//! | GET | `/count` | `{data, message}` |
//! | GET | `/pagination` | `{data, total, message}` |
//! | POST | `/` | `{message}` |
//! | PUT | `/{id}` | `{message}` |
//! | DELETE | `/{id}` | `{message}` |
//! | DELETE | `/` | `{message}` |

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;

use crate::crud::error::{ApiError, ApiResult};
use crate::crud::pagination::page_window;
use crate::crud::params::{DocumentListQuery, PageQuery, PageRequest, RecordId};
use crate::http::request::Payload;
use crate::http::response::{DataResponse, MessageResponse, PagedResponse};
use crate::http::server::AppState;
use crate::store::ListFilter;

pub const SAVED: &str = "List saved";
pub const UPDATED: &str = "List updated";
pub const DELETED: &str = "List deleted";
pub const MISSING_TEXT: &str = "Please pass text.";

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> ApiResult<Json<DataResponse<Vec<Value>>>> {
    let filter = query.into_filter();
    let data = state.documents.find(&filter).await?;

    tracing::debug!(
        backend = state.documents.backend(),
        results = data.len(),
        filtered = !filter.is_empty(),
        "Listed records"
    );
    Ok(Json(DataResponse::obtained(data)))
}

pub async fn item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Vec<Value>>>> {
    let data = state.documents.find(&ListFilter::by_id(id)).await?;
    Ok(Json(DataResponse::obtained(data)))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<DataResponse<u64>>> {
    let data = state.documents.count().await?;
    Ok(Json(DataResponse::obtained(data)))
}

pub async fn pagination(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PagedResponse<Value>>> {
    let request = PageRequest::from(query);
    let count = state.documents.count().await?;

    let data = match page_window(request, count) {
        Some(window) => state.documents.paginate(window).await?.rows,
        None => Vec::new(),
    };

    Ok(Json(PagedResponse::obtained(data, count)))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<Json<MessageResponse>> {
    if !body.get("text").is_some_and(is_truthy) {
        return Err(ApiError::Validation(MISSING_TEXT));
    }

    let record = state.documents.create(body).await?;
    tracing::info!(backend = state.documents.backend(), id = %record["_id"], "Record created");

    Ok(Json(MessageResponse::new(SAVED)))
}

pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(body): Payload,
) -> ApiResult<Json<MessageResponse>> {
    let matched = state.documents.update(&id, body).await?;
    tracing::info!(backend = state.documents.backend(), id = %id, matched, "Record updated");

    Ok(Json(MessageResponse::new(UPDATED)))
}

pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<MessageResponse>> {
    let removed = state.documents.delete(&id).await?;
    tracing::info!(backend = state.documents.backend(), id = %id, removed, "Record deleted");

    Ok(Json(MessageResponse::new(DELETED)))
}

pub async fn delete_many(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<Json<MessageResponse>> {
    let selected = selected_ids(body.get("selected"));
    let removed = state.documents.delete_many(&selected).await?;
    tracing::info!(
        backend = state.documents.backend(),
        selected = selected.len(),
        removed,
        "Records deleted"
    );

    Ok(Json(MessageResponse::new(DELETED)))
}

/// JavaScript-style truthiness: null, false, 0, NaN and "" are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Identifiers from the `selected` field. Anything but an array is empty.
fn selected_ids(selected: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = selected else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}
