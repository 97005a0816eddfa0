//! Orders and their line items.
//!
//! Lines are created here when the order is placed. After that only the WZ issuance
//! changes them.

use crate::{
    core::conversion::{Dimensions, convert},
    entities::{InclusionState, LineStatus, Order, OrderLineItem, Unit, order, order_line_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// One line of a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    /// Product ordered
    pub product_id: i64,
    /// Ordered quantity in `unit`
    pub quantity: Decimal,
    /// Primary unit
    pub unit: Unit,
    /// Optional secondary unit
    pub helper_unit: Option<Unit>,
    /// Helper quantity for independent pairs; ignored when it can be computed
    pub helper_quantity: Option<Decimal>,
    /// Net price per `unit`
    pub unit_price: Decimal,
}

/// Creates an order.
///
/// # Errors
/// Returns an error if the order number is empty or the insert fails.
pub async fn create_order(
    db: &DatabaseConnection,
    order_number: String,
    customer_name: String,
) -> Result<order::Model> {
    if order_number.trim().is_empty() {
        return Err(Error::Config {
            message: "Order number cannot be empty".to_string(),
        });
    }

    let order = order::ActiveModel {
        order_number: Set(order_number.trim().to_string()),
        customer_name: Set(customer_name.trim().to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    order.insert(db).await.map_err(Into::into)
}

/// Finds an order by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_order_by_id(db: &DatabaseConnection, order_id: i64) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Adds a line to an order.
///
/// The helper quantity is computed from the product's dimensions when the unit pair is
/// convertible; otherwise the supplied value is stored as entered.
///
/// # Errors
/// Returns an error if:
/// - The quantity is not positive or the unit price is negative
/// - The order or the product does not exist
/// - The database insert fails
pub async fn add_order_line(
    db: &DatabaseConnection,
    order_id: i64,
    line: NewOrderLine,
) -> Result<order_line_item::Model> {
    if line.quantity <= Decimal::ZERO {
        return Err(Error::InvalidQuantity {
            value: line.quantity.to_string(),
        });
    }
    if line.unit_price.is_sign_negative() && !line.unit_price.is_zero() {
        return Err(Error::InvalidQuantity {
            value: line.unit_price.to_string(),
        });
    }

    get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { order_id })?;
    let product = crate::core::product::get_product_by_id(db, line.product_id)
        .await?
        .ok_or(Error::ProductNotFound {
            product_id: line.product_id,
        })?;

    let helper_quantity = match line.helper_unit {
        Some(helper) if line.unit.is_convertible_with(helper) => Some(convert(
            line.quantity,
            line.unit,
            helper,
            &Dimensions::from(&product),
        )),
        Some(_) => line.helper_quantity,
        None => None,
    };

    let item = order_line_item::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(product.id),
        product_name: Set(product.name),
        quantity: Set(line.quantity),
        quant_unit: Set(line.unit),
        helper_quantity: Set(helper_quantity),
        help_quant_unit: Set(line.helper_unit),
        unit_price: Set(line.unit_price),
        status: Set(LineStatus::Open),
        inclusion: Set(InclusionState::Unprocessed),
        origin_line_id: Set(None),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// All line items of an order, including consumed ones, oldest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_order_line_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_line_item::Model>> {
    OrderLineItem::find()
        .filter(order_line_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_line_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
