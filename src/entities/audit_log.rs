//! Audit log entity - Append-only record of business events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Entity kind (e.g., `"wz_document"`)
    pub entity: String,
    /// Primary key of the affected row
    pub entity_id: i64,
    /// Human-readable name of the affected row (e.g., `"WZ 3/10/2026"`)
    pub entity_name: String,
    /// Event kind (e.g., `"created"`)
    pub event_type: String,
    /// Optional JSON payload describing the change
    pub changed_data: Option<Json>,
    /// When the event was recorded
    pub created_at: DateTimeUtc,
}

/// Audit entries have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
