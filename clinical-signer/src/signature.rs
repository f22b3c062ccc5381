// Signature record produced when a clinical record is signed
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of signing a record snapshot
///
/// Created once at signing time and immutable afterwards; during
/// verification it is only compared against a recomputed digest, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// The content digest, exposed under the name callers historically
    /// persisted on the signed record. Always equal to `content_hash`.
    pub signature: String,

    /// 64-character lowercase hex SHA-256 digest over the canonical
    /// serialization of the payload, the signer id and `signed_at`.
    pub content_hash: String,

    /// ISO-8601 timestamp captured at signing time. Kept as the exact
    /// string that entered the hash input; reformatting a parsed date is
    /// not guaranteed to reproduce these bytes.
    pub signed_at: String,

    /// Identifier of the acting subject (opaque string/UUID).
    pub signer_id: String,
}

impl SignatureRecord {
    /// Parse `signed_at` back into a UTC timestamp.
    ///
    /// Returns `None` if the stored string is not valid ISO-8601. Use the
    /// raw `signed_at` string for verification, never this parsed value.
    pub fn signed_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.signed_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_at_round_trip() {
        let record = SignatureRecord {
            signature: "ab".repeat(32),
            content_hash: "ab".repeat(32),
            signed_at: "2024-01-01T00:00:00.000Z".to_string(),
            signer_id: "u1".to_string(),
        };

        let parsed = record.signed_at_utc().unwrap();
        assert_eq!(parsed.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_signed_at_invalid_string() {
        let record = SignatureRecord {
            signature: String::new(),
            content_hash: String::new(),
            signed_at: "not-a-date".to_string(),
            signer_id: "u1".to_string(),
        };

        assert!(record.signed_at_utc().is_none());
    }
}
