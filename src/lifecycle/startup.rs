//! Startup orchestration.
//!
//! # Responsibilities
//! - Open both storage backends from configuration
//! - Log each backend connection
//!
//! # Design Decisions
//! - Fail fast: a store that cannot open aborts startup
//! - Stores open before the listener binds (traffic only when ready)

use std::sync::Arc;

use crate::config::{AppConfig, StorageConfig};
use crate::http::server::AppState;
use crate::store::{DocumentStore, ListStore, RelationalStore, StoreResult};

/// Open the document collection described by `config`.
pub fn open_document_store(config: &StorageConfig) -> StoreResult<Arc<dyn ListStore>> {
    let store = match &config.document_path {
        Some(path) => DocumentStore::open(path)?,
        None => DocumentStore::in_memory()?,
    };

    tracing::info!(
        database = ?config.document_path,
        "Document store: connection succeeded"
    );
    Ok(Arc::new(store))
}

/// Open the relational table described by `config`.
pub fn open_relational_store(config: &StorageConfig) -> StoreResult<Arc<dyn ListStore>> {
    let store = RelationalStore::open(&config.relational_url)?;

    tracing::info!(
        database = %config.relational_url,
        "Relational store: connection succeeded"
    );
    Ok(Arc::new(store))
}

/// Open every store and assemble the handler state.
pub fn build_state(config: &AppConfig) -> StoreResult<AppState> {
    let documents = open_document_store(&config.storage)?;
    let relational = open_relational_store(&config.storage).inspect_err(|e| {
        tracing::error!(error = %e, "Relational store: connection failed");
    })?;

    Ok(AppState::new(documents, relational, config.mode.as_str()))
}
