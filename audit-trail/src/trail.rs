//! Durable recording and retrieval of audit entries
//!
//! The trail is the accountability record for clinical-data mutations:
//! callers persist their domain write first, then append an audit entry
//! here. The two writes are not one transaction; a failed audit write
//! surfaces as an error and the caller decides how to treat the already
//! committed primary operation. Entries are never retried here.

use crate::config::AuditTrailConfig;
use crate::entry::{AuditAction, AuditEntry, NewAuditEntry};
use crate::error::{AuditError, AuditResult};
use crate::page::{Page, PageRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use clinical_signer::RecordSigner;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

/// Entity kinds that appear in patient-scoped queries.
///
/// A fixed allow-list: entries of any other kind are excluded from
/// [`AuditTrail::query_by_subject`] even when their `subject_id` matches.
pub const SUBJECT_ENTITY_KINDS: [&str; 4] =
    ["ClinicalEvolution", "VitalSign", "Diagnosis", "ClinicalAlert"];

/// Hash input for one entry. Field order is part of the hash bytes.
#[derive(Serialize)]
struct RecordHashPayload<'a> {
    entity: &'a str,
    entity_id: &'a str,
    action: &'a str,
}

/// Append-only audit store
///
/// Owns its SQLite pool and a [`RecordSigner`]; construct one instance per
/// process and pass it to callers explicitly.
#[derive(Clone)]
pub struct AuditTrail {
    pool: SqlitePool,
    signer: RecordSigner,
}

impl AuditTrail {
    /// Open (or create) the audit database and prepare its schema.
    ///
    /// The database file is created up front so its permissions can be
    /// restricted to the owning user before any data lands in it.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Internal`] when the file cannot be created and
    /// [`AuditError::Database`] when the connection or schema setup fails.
    pub async fn new(config: AuditTrailConfig) -> AuditResult<Self> {
        if !Path::new(&config.db_path).exists() {
            std::fs::File::create(&config.db_path)
                .map_err(|e| AuditError::Internal(format!("Failed to create audit file: {}", e)))?;

            // Audit rows carry PHI snapshots; owner read/write only
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;

                let permissions = std::fs::Permissions::from_mode(0o600);
                std::fs::set_permissions(&config.db_path, permissions).map_err(|e| {
                    AuditError::Internal(format!("Failed to set audit file permissions: {}", e))
                })?;
            }
        }

        let db_url = format!("sqlite:{}", config.db_path);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&db_url)
            .await?;

        if config.enable_wal {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
        }

        let trail = Self {
            pool,
            signer: RecordSigner::new(),
        };

        trail.initialize_schema().await?;

        Ok(trail)
    }

    /// Create the audit table and its indexes
    async fn initialize_schema(&self) -> AuditResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_trail (
                id TEXT PRIMARY KEY,
                entity TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                subject_id TEXT,
                action TEXT NOT NULL,
                actor_id TEXT NOT NULL,
                actor_name TEXT NOT NULL,
                actor_role TEXT NOT NULL,
                before_state TEXT,
                after_state TEXT,
                origin_ip TEXT,
                user_agent TEXT,
                device_info TEXT,
                record_hash TEXT NOT NULL,
                occurred_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_trail(entity, entity_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_subject ON audit_trail(subject_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_actor ON audit_trail(actor_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_occurred ON audit_trail(occurred_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Append one audit entry and return it as persisted.
    ///
    /// Assigns the entry id and `occurred_at`, computes the record hash
    /// over `{entity, entity_id, action}` bound to the actor and the
    /// occurrence timestamp, and writes the row. Before/after snapshots
    /// are stored but are not part of the hash input.
    ///
    /// # Errors
    ///
    /// A rejected or failed write propagates as [`AuditError::Database`];
    /// entries are never silently dropped and never retried here.
    pub async fn record(&self, new_entry: NewAuditEntry) -> AuditResult<AuditEntry> {
        let id = Uuid::new_v4();
        let occurred_at = Utc::now();
        let occurred_at_iso = occurred_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let payload = RecordHashPayload {
            entity: &new_entry.entity,
            entity_id: &new_entry.entity_id,
            action: new_entry.action.as_str(),
        };
        let record_hash = self
            .signer
            .compute_digest(&payload, &new_entry.actor_id, &occurred_at_iso)?;

        let entry = AuditEntry {
            id,
            entity: new_entry.entity,
            entity_id: new_entry.entity_id,
            subject_id: new_entry.subject_id,
            action: new_entry.action,
            actor_id: new_entry.actor_id,
            actor_name: new_entry.actor_name,
            actor_role: new_entry.actor_role,
            before_state: new_entry.before_state,
            after_state: new_entry.after_state,
            origin_ip: new_entry.origin_ip,
            user_agent: new_entry.user_agent,
            device_info: new_entry.device_info,
            record_hash,
            occurred_at,
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO audit_trail (
                id, entity, entity_id, subject_id, action,
                actor_id, actor_name, actor_role,
                before_state, after_state,
                origin_ip, user_agent, device_info,
                record_hash, occurred_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.entity)
        .bind(&entry.entity_id)
        .bind(entry.subject_id.as_ref())
        .bind(entry.action.as_str())
        .bind(&entry.actor_id)
        .bind(&entry.actor_name)
        .bind(&entry.actor_role)
        .bind(entry.before_state.as_ref().map(|v| v.to_string()))
        .bind(entry.after_state.as_ref().map(|v| v.to_string()))
        .bind(entry.origin_ip.as_ref())
        .bind(entry.user_agent.as_ref())
        .bind(entry.device_info.as_ref())
        .bind(&entry.record_hash)
        .bind(&occurred_at_iso)
        .execute(&self.pool)
        .await;

        if let Err(e) = insert {
            error!(
                target: "audit",
                error = %e,
                entity = %entry.entity,
                entity_id = %entry.entity_id,
                "Audit write failed"
            );
            return Err(AuditError::Database(e));
        }

        info!(
            target: "audit",
            entity = %entry.entity,
            entity_id = %entry.entity_id,
            action = %entry.action,
            actor_id = %entry.actor_id,
            "Audit entry recorded"
        );

        Ok(entry)
    }

    /// Recompute an entry's hash from its stored fields and compare.
    ///
    /// Per-entry verification only; entries carry no link to their
    /// predecessor, so this cannot detect deletion of whole rows.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Signing`] when the hash input cannot be
    /// serialized.
    pub fn verify_entry(&self, entry: &AuditEntry) -> AuditResult<bool> {
        let occurred_at_iso = entry.occurred_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let payload = RecordHashPayload {
            entity: &entry.entity,
            entity_id: &entry.entity_id,
            action: entry.action.as_str(),
        };

        let verified =
            self.signer
                .verify(&payload, &entry.actor_id, &occurred_at_iso, &entry.record_hash)?;

        Ok(verified)
    }

    /// Entries for one entity instance, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Database`] when the query fails. No-match is
    /// an empty page, not an error.
    pub async fn query_by_entity(
        &self,
        entity: &str,
        entity_id: &str,
        request: PageRequest,
    ) -> AuditResult<Page<AuditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, entity, entity_id, subject_id, action,
                   actor_id, actor_name, actor_role,
                   before_state, after_state,
                   origin_ip, user_agent, device_info,
                   record_hash, occurred_at
            FROM audit_trail
            WHERE entity = ? AND entity_id = ?
            ORDER BY occurred_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(entity)
        .bind(entity_id)
        .bind(i64::from(request.limit))
        .bind(i64::from(request.offset()))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM audit_trail WHERE entity = ? AND entity_id = ?")
                .bind(entity)
                .bind(entity_id)
                .fetch_one(&self.pool)
                .await?
                .try_get("count")?;

        Ok(Page::new(rows_to_entries(rows)?, total as u64, request))
    }

    /// Patient-scoped entries across the clinically-relevant entity kinds,
    /// newest first. Restricted to [`SUBJECT_ENTITY_KINDS`].
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Database`] when the query fails.
    pub async fn query_by_subject(
        &self,
        subject_id: &str,
        request: PageRequest,
    ) -> AuditResult<Page<AuditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, entity, entity_id, subject_id, action,
                   actor_id, actor_name, actor_role,
                   before_state, after_state,
                   origin_ip, user_agent, device_info,
                   record_hash, occurred_at
            FROM audit_trail
            WHERE subject_id = ? AND entity IN (?, ?, ?, ?)
            ORDER BY occurred_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(subject_id)
        .bind(SUBJECT_ENTITY_KINDS[0])
        .bind(SUBJECT_ENTITY_KINDS[1])
        .bind(SUBJECT_ENTITY_KINDS[2])
        .bind(SUBJECT_ENTITY_KINDS[3])
        .bind(i64::from(request.limit))
        .bind(i64::from(request.offset()))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM audit_trail WHERE subject_id = ? AND entity IN (?, ?, ?, ?)",
        )
        .bind(subject_id)
        .bind(SUBJECT_ENTITY_KINDS[0])
        .bind(SUBJECT_ENTITY_KINDS[1])
        .bind(SUBJECT_ENTITY_KINDS[2])
        .bind(SUBJECT_ENTITY_KINDS[3])
        .fetch_one(&self.pool)
        .await?
        .try_get("count")?;

        Ok(Page::new(rows_to_entries(rows)?, total as u64, request))
    }

    /// Entries performed by one actor, newest first, across all entities.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Database`] when the query fails.
    pub async fn query_by_actor(
        &self,
        actor_id: &str,
        request: PageRequest,
    ) -> AuditResult<Page<AuditEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, entity, entity_id, subject_id, action,
                   actor_id, actor_name, actor_role,
                   before_state, after_state,
                   origin_ip, user_agent, device_info,
                   record_hash, occurred_at
            FROM audit_trail
            WHERE actor_id = ?
            ORDER BY occurred_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(actor_id)
        .bind(i64::from(request.limit))
        .bind(i64::from(request.offset()))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM audit_trail WHERE actor_id = ?")
                .bind(actor_id)
                .fetch_one(&self.pool)
                .await?
                .try_get("count")?;

        Ok(Page::new(rows_to_entries(rows)?, total as u64, request))
    }
}

/// Convert database rows to audit entries
fn rows_to_entries(rows: Vec<SqliteRow>) -> AuditResult<Vec<AuditEntry>> {
    rows.into_iter().map(row_to_entry).collect()
}

fn row_to_entry(row: SqliteRow) -> AuditResult<AuditEntry> {
    let id_str: String = row.try_get("id")?;
    let action_str: String = row.try_get("action")?;
    let occurred_at_str: String = row.try_get("occurred_at")?;
    let before_state_str: Option<String> = row.try_get("before_state")?;
    let after_state_str: Option<String> = row.try_get("after_state")?;

    Ok(AuditEntry {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AuditError::Internal(format!("Invalid UUID: {}", e)))?,
        entity: row.try_get("entity")?,
        entity_id: row.try_get("entity_id")?,
        subject_id: row.try_get("subject_id")?,
        action: AuditAction::parse(&action_str)?,
        actor_id: row.try_get("actor_id")?,
        actor_name: row.try_get("actor_name")?,
        actor_role: row.try_get("actor_role")?,
        before_state: parse_state(before_state_str)?,
        after_state: parse_state(after_state_str)?,
        origin_ip: row.try_get("origin_ip")?,
        user_agent: row.try_get("user_agent")?,
        device_info: row.try_get("device_info")?,
        record_hash: row.try_get("record_hash")?,
        occurred_at: parse_occurred_at(&occurred_at_str)?,
    })
}

fn parse_state(state: Option<String>) -> AuditResult<Option<serde_json::Value>> {
    state
        .map(|s| {
            serde_json::from_str(&s)
                .map_err(|e| AuditError::Internal(format!("Invalid state snapshot: {}", e)))
        })
        .transpose()
}

fn parse_occurred_at(s: &str) -> AuditResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AuditError::Internal(format!("Invalid timestamp: {}", e)))
}
