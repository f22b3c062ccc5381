//! Digest computation and verification
//!
//! The digest binds three values with a fixed `|` delimiter:
//!
//! ```text
//! SHA-256( json(payload) + "|" + signer_id + "|" + timestamp_iso )
//! ```
//!
//! Payload serialization follows serde's declaration/insertion order. This
//! is stable for a given type but is NOT canonical JSON: two structurally
//! equal payloads serialized from differently-ordered sources may hash
//! differently. Callers that need hash stability must re-sign from the same
//! snapshot type.

use crate::error::SignerResult;
use crate::signature::SignatureRecord;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Number of hex characters exposed by [`short_digest`].
pub const SHORT_DIGEST_LEN: usize = 16;

/// Stateless signing handle
///
/// One logical instance per process, passed to callers explicitly. All
/// methods except [`RecordSigner::create_signature`] are pure; that one
/// reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordSigner;

impl RecordSigner {
    pub fn new() -> Self {
        Self
    }

    /// Compute the content digest for a payload/signer/timestamp triple.
    ///
    /// The timestamp is taken verbatim, not re-derived here: the caller
    /// must pass the exact string that will be stored alongside the hash,
    /// otherwise later verification cannot reproduce the input bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignerError::Serialization`] when the payload
    /// cannot be serialized to JSON.
    pub fn compute_digest<T: Serialize>(
        &self,
        payload: &T,
        signer_id: &str,
        timestamp_iso: &str,
    ) -> SignerResult<String> {
        let serialized = serde_json::to_string(payload)?;

        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        hasher.update(b"|");
        hasher.update(signer_id.as_bytes());
        hasher.update(b"|");
        hasher.update(timestamp_iso.as_bytes());

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Sign a payload on behalf of an actor, stamping the current time.
    ///
    /// The timestamp is formatted with millisecond precision and a `Z`
    /// suffix (`2024-01-01T00:00:00.000Z`) so that the stored string and
    /// the hashed string are byte-identical.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignerError::Serialization`] when the payload
    /// cannot be serialized to JSON.
    pub fn create_signature<T: Serialize>(
        &self,
        payload: &T,
        signer_id: &str,
    ) -> SignerResult<SignatureRecord> {
        let signed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let content_hash = self.compute_digest(payload, signer_id, &signed_at)?;

        Ok(SignatureRecord {
            signature: content_hash.clone(),
            content_hash,
            signed_at,
            signer_id: signer_id.to_string(),
        })
    }

    /// Check a claimed hash against a payload/signer/timestamp triple.
    ///
    /// Hex comparison is case-insensitive. Any mismatch, including a
    /// payload mutated after signing, yields `false` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignerError::Serialization`] when the payload
    /// cannot be serialized to JSON.
    pub fn verify<T: Serialize>(
        &self,
        payload: &T,
        signer_id: &str,
        timestamp_iso: &str,
        claimed_hash: &str,
    ) -> SignerResult<bool> {
        let recomputed = self.compute_digest(payload, signer_id, timestamp_iso)?;
        Ok(recomputed.eq_ignore_ascii_case(claimed_hash))
    }
}

/// Truncate a digest for display.
///
/// Returns the first [`SHORT_DIGEST_LEN`] characters, the whole digest if
/// it is shorter, or `None` for an empty input. Cosmetic only, never used
/// for verification.
pub fn short_digest(digest: &str) -> Option<&str> {
    if digest.is_empty() {
        return None;
    }
    Some(digest.get(..SHORT_DIGEST_LEN).unwrap_or(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXED_TS: &str = "2024-01-01T00:00:00.000Z";

    #[test]
    fn test_digest_is_deterministic() {
        let signer = RecordSigner::new();
        let payload = json!({"subjective": "headache", "plan": "rest"});

        let first = signer.compute_digest(&payload, "doctor-1", FIXED_TS).unwrap();
        let second = signer.compute_digest(&payload, "doctor-1", FIXED_TS).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_digest_format() {
        let signer = RecordSigner::new();
        let digest = signer.compute_digest(&json!({"a": 1}), "u1", FIXED_TS).unwrap();

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_answer() {
        // SHA-256 over the exact bytes `{"a":1}|u1|2024-01-01T00:00:00.000Z`
        let signer = RecordSigner::new();
        let digest = signer.compute_digest(&json!({"a": 1}), "u1", FIXED_TS).unwrap();

        assert_eq!(
            digest,
            "f77d894f468196c2800ce8d834e090cf2833184469421d2b4c7987df4a1eec63"
        );
    }

    #[test]
    fn test_digest_sensitivity() {
        let signer = RecordSigner::new();
        let base = signer.compute_digest(&json!({"a": 1}), "u1", FIXED_TS).unwrap();

        let changed_payload = signer.compute_digest(&json!({"a": 2}), "u1", FIXED_TS).unwrap();
        let changed_actor = signer.compute_digest(&json!({"a": 1}), "u2", FIXED_TS).unwrap();
        let changed_ts = signer
            .compute_digest(&json!({"a": 1}), "u1", "2024-01-01T00:00:00.001Z")
            .unwrap();

        assert_ne!(base, changed_payload);
        assert_ne!(base, changed_actor);
        assert_ne!(base, changed_ts);
    }

    #[test]
    fn test_signature_round_trip() {
        let signer = RecordSigner::new();
        let payload = json!({"analysis": "stable", "plan": "follow-up in 30 days"});

        let record = signer.create_signature(&payload, "doctor-7").unwrap();

        assert_eq!(record.signature, record.content_hash);
        assert_eq!(record.signer_id, "doctor-7");
        assert!(record.signed_at.ends_with('Z'));

        let verified = signer
            .verify(&payload, "doctor-7", &record.signed_at, &record.content_hash)
            .unwrap();
        assert!(verified);
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let signer = RecordSigner::new();
        let payload = json!({"plan": "rest"});
        let record = signer.create_signature(&payload, "doctor-7").unwrap();

        let tampered = json!({"plan": "surgery"});
        let verified = signer
            .verify(&tampered, "doctor-7", &record.signed_at, &record.content_hash)
            .unwrap();

        assert!(!verified);
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let signer = RecordSigner::new();
        let payload = json!({"a": 1});
        let digest = signer.compute_digest(&payload, "u1", FIXED_TS).unwrap();

        let verified = signer
            .verify(&payload, "u1", FIXED_TS, &digest.to_uppercase())
            .unwrap();

        assert!(verified);
    }

    #[test]
    fn test_serialization_failure_propagates() {
        use std::collections::BTreeMap;

        let signer = RecordSigner::new();
        // JSON object keys must be strings; a tuple key cannot serialize
        let mut payload: BTreeMap<(u8, u8), u8> = BTreeMap::new();
        payload.insert((1, 2), 3);

        assert!(signer.compute_digest(&payload, "u1", FIXED_TS).is_err());
    }

    #[test]
    fn test_short_digest() {
        let digest = "f77d894f468196c2800ce8d834e090cf2833184469421d2b4c7987df4a1eec63";

        let short = short_digest(digest).unwrap();
        assert_eq!(short.len(), SHORT_DIGEST_LEN);
        assert_eq!(short, &digest[..16]);

        assert_eq!(short_digest(""), None);
        assert_eq!(short_digest("abc"), Some("abc"));
    }
}
