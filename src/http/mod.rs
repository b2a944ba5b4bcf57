//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware chain)
//!     → request.rs (request id, body parsing)
//!     → routing layer picks the handler
//!     → response.rs (JSON envelopes)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::Payload;
pub use server::{AppState, HttpServer};
