use thiserror::Error;

use crate::services::{ExtractionError, StoreError};

/// Failures surfaced at the request/response boundary.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    #[error("{0}")]
    Persistence(#[from] StoreError),
    #[error("Unknown action")]
    UnknownAction(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to encode payload: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Service channel closed")]
    ChannelClosed,
    #[error("{0}")]
    ScanFailed(String),
    #[error("Failed to export logs: {0}")]
    Export(#[from] std::io::Error),
}
