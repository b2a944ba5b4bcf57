//! Response envelopes.
//!
//! # Shapes
//! - `{ data, message }` for reads
//! - `{ data, total, message }` for the document page listing
//! - `{ data }` for relational listing and paging
//! - `{ message }` for writes and errors

use serde::Serialize;

/// Message attached to successful reads.
pub const DATA_OBTAINED: &str = "Data obtained.";

#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}

impl<T: Serialize> DataResponse<T> {
    pub fn obtained(data: T) -> Self {
        Self {
            data,
            message: DATA_OBTAINED,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: u64,
    pub message: &'static str,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn obtained(data: Vec<T>, total: u64) -> Self {
        Self {
            data,
            total,
            message: DATA_OBTAINED,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BareResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
