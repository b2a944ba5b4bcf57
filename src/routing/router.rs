//! Application route table.
//!
//! ```text
//! GET /                   → mode banner (plain text)
//! /crud-operations/...    → crud::routes()
//! ```

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::crud;
use crate::http::server::AppState;

/// Build the full route table bound to `state`.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .nest(crud::PREFIX, crud::routes())
        .with_state(state)
}

async fn banner(State(state): State<AppState>) -> String {
    format!("app-root, {} mode", state.mode)
}
