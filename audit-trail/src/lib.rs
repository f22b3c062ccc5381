//! Append-only audit trail for clinical-data mutations
//!
//! Provides:
//! - Durable, append-only recording of state-changing actions on clinical
//!   entities (who, what, when, before/after snapshots)
//! - A per-entry content hash computed through `clinical-signer` for
//!   tamper evidence
//! - Paginated query views by entity instance, by patient, and by actor
//! - SQLite persistence with restricted file permissions
//!
//! Entries are never updated or deleted once written. Each entry's hash is
//! computed independently; entries are not chained to one another.

pub mod config;
pub mod entry;
pub mod error;
pub mod page;
pub mod trail;

pub use config::AuditTrailConfig;
pub use entry::{AuditAction, AuditEntry, NewAuditEntry};
pub use error::{AuditError, AuditResult};
pub use page::{Page, PageRequest};
pub use trail::{AuditTrail, SUBJECT_ENTITY_KINDS};
