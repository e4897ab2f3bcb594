//! Shared type definitions for the database layer.

use thiserror::Error;

use crate::types::{AccountType, Direction, OpportunityStage, Priority};
use crate::validate::ValidationErrors;

/// Errors surfaced by store operations.
///
/// Validation failures are recoverable — fix the input and retry. Storage
/// failures are fatal for the request; nothing in this crate retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("duplicate {kind} id: {id}")]
    DuplicateKey { kind: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("storage unavailable: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("entity encoding failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("home directory not found")]
    HomeDirNotFound,

    #[error("failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("schema migration failed: {0}")]
    Migration(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Map an INSERT failure: a primary-key constraint hit becomes
    /// `DuplicateKey`, anything else stays a storage error.
    pub(crate) fn from_insert(kind: &'static str, id: &str, err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateKey {
                    kind,
                    id: id.to_string(),
                }
            }
            other => StoreError::Storage(other),
        }
    }
}

// =============================================================================
// Scalar-column filters
// =============================================================================
//
// Filters run against indexed scalar columns only — never against the
// data_json blob. An empty filter matches everything; results come back in
// insertion (rowid) order.

#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub region: Option<String>,
    pub account_type: Option<AccountType>,
    /// Inclusive lower bound on churn_risk_score.
    pub min_churn_risk: Option<f64>,
    /// Inclusive upper bound on churn_risk_score.
    pub max_churn_risk: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityFilter {
    pub account_id: Option<String>,
    pub stage: Option<OpportunityStage>,
}

#[derive(Debug, Clone, Default)]
pub struct CommunicationFilter {
    pub account_id: Option<String>,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Default)]
pub struct InsightFilter {
    pub account_id: Option<String>,
    pub priority: Option<Priority>,
    pub acted_upon: Option<bool>,
}
