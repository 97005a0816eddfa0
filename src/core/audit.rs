//! Audit log sink.
//!
//! Business operations report what they did through [`AuditSink`]. Logging is
//! best-effort: a failing sink is reported with `warn!` and never fails the operation
//! that produced the event.

use crate::{entities::audit_log, errors::Result};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Event kind written for newly created entities.
pub const EVENT_CREATED: &str = "created";

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Entity kind (e.g., `"wz_document"`)
    pub entity: String,
    /// Primary key of the affected row
    pub entity_id: i64,
    /// Human-readable name of the affected row
    pub entity_name: String,
    /// Event kind
    pub event_type: String,
    /// Optional JSON payload
    pub changed_data: Option<Json>,
}

impl AuditEvent {
    /// Event for a freshly created entity.
    #[must_use]
    pub fn created(
        entity: &str,
        entity_id: i64,
        entity_name: String,
        changed_data: Option<Json>,
    ) -> Self {
        Self {
            entity: entity.to_string(),
            entity_id,
            entity_name,
            event_type: EVENT_CREATED.to_string(),
            changed_data,
        }
    }
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one event.
    async fn log_event(&self, event: AuditEvent) -> Result<()>;
}

/// Writes audit events to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct DatabaseAuditSink {
    db: Arc<DatabaseConnection>,
}

impl DatabaseAuditSink {
    /// Creates a sink writing through the shared connection `db`.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditSink for DatabaseAuditSink {
    async fn log_event(&self, event: AuditEvent) -> Result<()> {
        let entry = audit_log::ActiveModel {
            entity: Set(event.entity),
            entity_id: Set(event.entity_id),
            entity_name: Set(event.entity_name),
            event_type: Set(event.event_type),
            changed_data: Set(event.changed_data),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        entry.insert(self.db.as_ref()).await?;
        Ok(())
    }
}

/// Sends `event` to `sink`, logging instead of failing when the sink errors.
pub async fn record_best_effort(sink: &dyn AuditSink, event: AuditEvent) {
    let entity = event.entity.clone();
    let entity_id = event.entity_id;
    if let Err(e) = sink.log_event(event).await {
        warn!(%entity, entity_id, error = %e, "Failed to write audit event");
    }
}
