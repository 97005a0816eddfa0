//! WZ line item entity - Snapshot of what one WZ document shipped for one order line.
//!
//! Values are copied, not referenced, so later product or price changes never alter an
//! issued document.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Unit;

/// WZ line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wz_line_items")]
pub struct Model {
    /// Unique identifier for the snapshot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Document this line is printed on
    pub wz_document_id: i64,
    /// Order line that was consumed
    pub order_line_item_id: i64,
    /// Product shipped
    pub product_id: i64,
    /// Product name at issue time
    pub product_name: String,
    /// Shipped quantity in `unit`
    pub quantity: Decimal,
    /// Unit the quantity was shipped in
    pub unit: Unit,
    /// Shipped quantity in the helper unit
    pub helper_quantity: Option<Decimal>,
    /// Helper unit, if any
    pub helper_unit: Option<Unit>,
    /// Net price per `price_unit`, copied from the originating order line
    pub unit_price: Decimal,
    /// Unit `unit_price` is quoted in; the order line's unit, which may differ from `unit`
    pub price_unit: Unit,
}

/// Defines relationships between `WzLineItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one document
    #[sea_orm(
        belongs_to = "super::wz_document::Entity",
        from = "Column::WzDocumentId",
        to = "super::wz_document::Column::Id"
    )]
    WzDocument,
    /// Each snapshot consumes one order line
    #[sea_orm(
        belongs_to = "super::order_line_item::Entity",
        from = "Column::OrderLineItemId",
        to = "super::order_line_item::Column::Id"
    )]
    OrderLineItem,
}

impl Related<super::wz_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WzDocument.def()
    }
}

impl Related<super::order_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLineItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
