//! Tamper-evidence signing for clinical records
//!
//! Provides:
//! - Deterministic SHA-256 content digests binding a payload to an actor
//!   and a timestamp
//! - Signature records for clinical-record mutations (evolution notes)
//! - Verification of previously issued digests against a claimed
//!   payload/actor/timestamp triple
//! - Display-friendly truncated digests

pub mod error;
pub mod signature;
pub mod signer;

pub use error::{SignerError, SignerResult};
pub use signature::SignatureRecord;
pub use signer::{short_digest, RecordSigner, SHORT_DIGEST_LEN};
