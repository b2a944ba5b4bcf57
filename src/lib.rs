//! CRUD API library.
//!
//! One `lists` resource served from two storage backends: a document
//! collection and a relational table.

pub mod config;
pub mod crud;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod store;

pub use config::schema::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
