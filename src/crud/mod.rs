//! CRUD operations subsystem.
//!
//! # Data Flow
//! ```text
//! /crud-operations/...            → document.rs   → AppState.documents
//! /crud-operations/relational/... → relational.rs → AppState.relational
//!     params.rs (query coercion), pagination.rs (page window)
//!     error.rs (ApiError → status + {message})
//! ```
//!
//! # Design Decisions
//! - `PUT`/`DELETE` on the static paths (`/count`, `/pagination`, their
//!   relational twins, and `PUT /relational`) reach the update and delete
//!   handlers with the segment as the id, as a `/{id}` capture would

pub mod document;
pub mod error;
pub mod pagination;
pub mod params;
pub mod relational;

use axum::routing::{get, put};
use axum::Router;

use crate::http::server::AppState;

/// Path prefix the CRUD routes are mounted under.
pub const PREFIX: &str = "/crud-operations";

/// Both handler sets, relative to [`PREFIX`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(document::list)
                .post(document::create)
                .delete(document::delete_many),
        )
        .route("/item/{id}", get(document::item))
        .route(
            "/count",
            get(document::count)
                .put(document::update)
                .delete(document::delete),
        )
        .route(
            "/pagination",
            get(document::pagination)
                .put(document::update)
                .delete(document::delete),
        )
        .route(
            "/relational",
            get(relational::list)
                .post(relational::create)
                .put(document::update)
                .delete(relational::delete_many),
        )
        .route("/relational/item/{id}", get(relational::item))
        .route(
            "/relational/count",
            get(relational::count)
                .put(relational::update)
                .delete(relational::delete),
        )
        .route(
            "/relational/pagination",
            get(relational::pagination)
                .put(relational::update)
                .delete(relational::delete),
        )
        .route(
            "/relational/{id}",
            put(relational::update).delete(relational::delete),
        )
        .route("/{id}", put(document::update).delete(document::delete))
}
