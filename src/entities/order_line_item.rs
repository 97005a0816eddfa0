//! Order line item entity - One ordered quantity of one product.
//!
//! Lines are never deleted. A partial shipment marks the shipped line `Consumed` and
//! creates a `Remainder` line for the balance, pointing back at the chain root through
//! `origin_line_id`. Summing a chain always gives back the originally ordered quantity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{InclusionState, LineStatus, Unit};

/// Order line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_line_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning order
    pub order_id: i64,
    /// Referenced product; products live outside this schema so no foreign key is declared
    pub product_id: i64,
    /// Product name snapshot taken when the line was created
    pub product_name: String,
    /// Quantity still represented by this line, in `quant_unit`
    pub quantity: Decimal,
    /// Primary unit of the line
    pub quant_unit: Unit,
    /// Same physical amount expressed in `help_quant_unit`
    pub helper_quantity: Option<Decimal>,
    /// Secondary unit, if any
    pub help_quant_unit: Option<Unit>,
    /// Net price per `quant_unit`
    pub unit_price: Decimal,
    /// Whether the line still owes goods
    pub status: LineStatus,
    /// Position in the WZ workflow
    pub inclusion: InclusionState,
    /// Root line of the chain this line was split from, `None` for ordered lines
    pub origin_line_id: Option<i64>,
    /// When the line was created
    pub created_at: DateTime,
}

impl Model {
    /// Id of the originally ordered line this line descends from (itself for roots).
    #[must_use]
    pub fn chain_root(&self) -> i64 {
        self.origin_line_id.unwrap_or(self.id)
    }
}

/// Defines relationships between `OrderLineItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// A line is shipped on at most one WZ line snapshot
    #[sea_orm(has_many = "super::wz_line_item::Entity")]
    WzLineItems,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::wz_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WzLineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
