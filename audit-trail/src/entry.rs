// Audit entry types and structures
use crate::error::{AuditError, AuditResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Action recorded by an audit entry
///
/// Open enumeration: the set mirrors every action the clinical layer
/// currently audits. New kinds are added here, not free-formed as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Entity was created
    Create,
    /// Entity was modified
    Update,
    /// Entity was deleted
    Delete,
    /// Entity was viewed/accessed
    View,
    /// Entity was digitally signed
    Sign,
    /// Entity was downloaded
    Download,
    /// Entity was printed
    Print,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::View => "view",
            AuditAction::Sign => "sign",
            AuditAction::Download => "download",
            AuditAction::Print => "print",
        }
    }

    pub fn parse(s: &str) -> AuditResult<Self> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "view" => Ok(AuditAction::View),
            "sign" => Ok(AuditAction::Sign),
            "download" => Ok(AuditAction::Download),
            "print" => Ok(AuditAction::Print),
            _ => Err(AuditError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique audit entry ID
    pub id: Uuid,

    /// Domain entity type audited (e.g., "ClinicalEvolution")
    pub entity: String,

    /// Identifier of the specific entity instance
    pub entity_id: String,

    /// Patient this entry relates to, when the entity is patient-scoped
    pub subject_id: Option<String>,

    /// Action performed
    pub action: AuditAction,

    /// Identifier of the actor who performed the action
    pub actor_id: String,

    /// Actor display name, denormalized so the trail survives actor deletion
    pub actor_name: String,

    /// Actor role at the time of the action, denormalized
    pub actor_role: String,

    /// Entity snapshot before the action (absent for Create)
    pub before_state: Option<serde_json::Value>,

    /// Entity snapshot after the action (absent for Delete)
    pub after_state: Option<serde_json::Value>,

    /// Request origin IP, when known
    pub origin_ip: Option<String>,

    /// Request user agent, when known
    pub user_agent: Option<String>,

    /// Device information, when known
    pub device_info: Option<String>,

    /// SHA-256 content hash over {entity, entity_id, action} bound to the
    /// actor and `occurred_at`. Independent per entry, not chained.
    pub record_hash: String,

    /// Server-assigned timestamp of the action
    pub occurred_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new audit entry
///
/// `id`, `record_hash` and `occurred_at` are assigned by the trail at
/// write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub entity: String,
    pub entity_id: String,
    pub subject_id: Option<String>,
    pub action: AuditAction,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: String,
    pub before_state: Option<serde_json::Value>,
    pub after_state: Option<serde_json::Value>,
    pub origin_ip: Option<String>,
    pub user_agent: Option<String>,
    pub device_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        let actions = [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::View,
            AuditAction::Sign,
            AuditAction::Download,
            AuditAction::Print,
        ];

        for action in actions {
            assert_eq!(AuditAction::parse(action.as_str()).unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(AuditAction::parse("archive").is_err());
    }
}
