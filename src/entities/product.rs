//! Product entity - Physical attributes of a sellable product.
//!
//! Products are maintained outside the fulfillment core. The core only reads their
//! dimensions and packaging factor to convert quantities between units.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Unit;

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Length in millimeters
    pub length: Decimal,
    /// Width in millimeters
    pub width: Decimal,
    /// Height in millimeters
    pub height: Decimal,
    /// Pieces per package
    pub quantity_in_package: Decimal,
    /// Unit the product is normally sold in
    pub primary_unit: Unit,
    /// When the product was created
    pub created_at: DateTime,
}

/// Products are referenced by id only; no relations are declared
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
