//! Error types for the audit trail

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record hashing failed: {0}")]
    Signing(#[from] clinical_signer::SignerError),

    #[error("Unknown audit action: {0}")]
    InvalidAction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Internal(err.to_string())
    }
}

pub type AuditResult<T> = Result<T, AuditError>;
