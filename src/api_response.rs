//! The JSON envelopes used by the transaction API.

use serde::{Deserialize, Serialize};

/// A successful API response, serialised as `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DataResponse<T> {
    /// The payload.
    pub data: T,
}

/// A failed API response, serialised as `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// A message describing what went wrong.
    pub error: String,
}
