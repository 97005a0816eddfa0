//! WZ document entity - A goods-issue note recording what left the warehouse.
//!
//! Documents are immutable once created. `doc_number` is contiguous within
//! `(doc_type, month, year)` of `issue_date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::DocumentType;

/// Status written on every newly issued document
pub const STATUS_ISSUED: &str = "issued";

/// WZ document database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wz_documents")]
pub struct Model {
    /// Unique identifier for the document
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sequential number within the type/month/year bucket
    pub doc_number: i32,
    /// Document kind
    pub doc_type: DocumentType,
    /// Date the document was issued; determines the numbering bucket
    pub issue_date: Date,
    /// Date the goods left the warehouse
    pub out_date: Date,
    /// Document status
    pub status: String,
    /// Order this document fulfills
    pub order_id: i64,
    /// When the row was written
    pub created_at: DateTime,
}

/// Defines relationships between `WzDocument` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each document belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// One document has many consumed line snapshots
    #[sea_orm(has_many = "super::wz_line_item::Entity")]
    LineItems,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::wz_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
