//! Relational table handlers, mounted under `/relational`.
//!
//! These keep the observable behaviour of the relational endpoints as
//! published: listing has no `message`, paging ignores its parameters,
//! update writes the raw body into `updatedAt`, and bulk delete is inert.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{Map, Value};

use crate::crud::document::{DELETED, SAVED};
use crate::crud::error::ApiResult;
use crate::crud::params::{RecordId, RelationalListQuery};
use crate::http::request::Payload;
use crate::http::response::{BareResponse, DataResponse, MessageResponse};
use crate::http::server::AppState;
use crate::store::{Paged, Window};

/// Page served by `GET /relational/pagination`.
// TODO: honour `page` / `row` once the relational paging contract is settled.
const FIXED_WINDOW: Window = Window { offset: 0, limit: 5 };

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RelationalListQuery>,
) -> ApiResult<Json<BareResponse<Vec<Value>>>> {
    let data = state.relational.find(&query.into_filter()).await?;
    Ok(Json(BareResponse { data }))
}

pub async fn item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<[Option<Value>; 1]>>> {
    let row = state.relational.find_by_id(&id).await?;
    Ok(Json(DataResponse::obtained([row])))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<Json<DataResponse<u64>>> {
    let data = state.relational.count().await?;
    Ok(Json(DataResponse::obtained(data)))
}

pub async fn pagination(State(state): State<AppState>) -> ApiResult<Json<BareResponse<Paged>>> {
    let data = state.relational.paginate(FIXED_WINDOW).await?;
    Ok(Json(BareResponse { data }))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> ApiResult<Json<MessageResponse>> {
    let row = state.relational.create(body).await?;
    tracing::info!(backend = state.relational.backend(), id = %row["id"], "Record created");

    Ok(Json(MessageResponse::new(SAVED)))
}

/// Stores the whole body in `updatedAt`; no other column changes.
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    Payload(body): Payload,
) -> ApiResult<Json<MessageResponse>> {
    let mut changes = Map::new();
    changes.insert("updatedAt".to_string(), Value::Object(body));

    let matched = state.relational.update(&id, changes).await?;
    tracing::info!(backend = state.relational.backend(), id = %id, matched, "Record updated");

    Ok(Json(MessageResponse::new(SAVED)))
}

pub async fn delete(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> ApiResult<Json<MessageResponse>> {
    let removed = state.relational.delete(&id).await?;
    tracing::info!(backend = state.relational.backend(), id = %id, removed, "Record deleted");

    Ok(Json(MessageResponse::new(DELETED)))
}

/// Accepts and ignores `selected`; nothing is removed.
pub async fn delete_many() -> Json<MessageResponse> {
    tracing::debug!("Relational bulk delete is not supported; request ignored");
    Json(MessageResponse::new(""))
}
