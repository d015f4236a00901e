//! Campaign-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Authentication wait timed out after {seconds}s")]
    AuthenticationTimeout { seconds: u64 },

    #[error("Action surface unavailable: {message}")]
    SurfaceUnavailable { message: String },

    #[error("Surface operation failed: {operation}")]
    SurfaceError { operation: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type CampaignResult<T> = Result<T, CampaignError>;

/// Store failures, split by whether the condition is expected.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Expected, non-fatal: a record with this id already exists
    #[error("Engagement already recorded: {id}")]
    DuplicateId { id: String },

    /// Fatal to the current action only; callers skip the candidate and
    /// continue fail-open
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
