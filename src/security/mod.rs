//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP window)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (hardened response headers)
//! ```
//!
//! # Design Decisions
//! - Rate limit is keyed by peer IP from the connection, not headers
//! - Rejected requests still carry the limit headers

pub mod headers;
pub mod rate_limit;
