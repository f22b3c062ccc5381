// Audit trail configuration
use serde::{Deserialize, Serialize};

/// Configuration for the audit store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrailConfig {
    /// Path to the audit database file
    pub db_path: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Whether to enable WAL mode
    pub enable_wal: bool,
}

impl Default for AuditTrailConfig {
    fn default() -> Self {
        Self {
            db_path: "clinitrace_audit.db".to_string(),
            max_connections: 5,
            enable_wal: true,
        }
    }
}
