//! Data transfer objects owned by the web layer.
//!
//! Successful responses are the upstream shapes from [`crate::rtt`]
//! re-encoded as-is.

use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    pub message: String,
}
