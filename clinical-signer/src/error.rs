//! Error types for the clinical signer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Payload serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SignerError {
    fn from(err: serde_json::Error) -> Self {
        SignerError::Serialization(err.to_string())
    }
}

pub type SignerResult<T> = Result<T, SignerError>;
