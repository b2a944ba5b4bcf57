//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (static route table)
//!     → crud handlers or the root banner
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at startup
//! - Static segments win over captures (`/count` before `/{id}`)

pub mod router;
