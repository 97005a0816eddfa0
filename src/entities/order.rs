//! Order entity - Customer order owning a set of line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business order number (e.g., "ZAM/12/2026")
    pub order_number: String,
    /// Customer display name at the time of ordering
    pub customer_name: String,
    /// When the order was placed
    pub created_at: DateTime,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_line_item::Entity")]
    LineItems,
    /// One order is fulfilled by many WZ documents
    #[sea_orm(has_many = "super::wz_document::Entity")]
    WzDocuments,
}

impl Related<super::order_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::wz_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WzDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
