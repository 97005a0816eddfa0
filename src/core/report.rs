//! Fulfillment reporting.
//!
//! Summarizes, for each originally ordered line, how much has been delivered and how
//! much is still owed, following the chain of remainder lines the WZ documents created.

use crate::{
    core::conversion::{Dimensions, convert},
    entities::{LineStatus, Product, Unit, WzLineItem, order_line_item, product, wz_line_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Delivery progress of one originally ordered line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFulfillment {
    /// Id of the originally ordered line
    pub root_line_id: i64,
    /// Product name snapshot
    pub product_name: String,
    /// Unit all quantities below are expressed in
    pub unit: Unit,
    /// Sum of the quantities of every line in the chain
    pub ordered: Decimal,
    /// Sum of WZ snapshots for the chain, converted into `unit`
    pub delivered: Decimal,
    /// Sum of the open lines in the chain
    pub outstanding: Decimal,
    /// WZ documents that shipped part of the chain, in issue order
    pub wz_document_ids: Vec<i64>,
}

impl LineFulfillment {
    /// Whether nothing is left to deliver.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outstanding <= Decimal::ZERO
    }

    /// Delivered share of the ordered quantity, in percent.
    #[must_use]
    pub fn delivered_percent(&self) -> Decimal {
        if self.ordered.is_zero() {
            return Decimal::ZERO;
        }
        (self.delivered / self.ordered * Decimal::ONE_HUNDRED).round_dp(1)
    }
}

/// Builds the fulfillment summary for every ordered line of an order.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] for an unknown order, or an error if a database
/// query fails.
pub async fn order_fulfillment(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<LineFulfillment>> {
    crate::core::order::get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { order_id })?;
    let lines = crate::core::order::get_order_line_items(db, order_id).await?;
    let line_ids: Vec<i64> = lines.iter().map(|line| line.id).collect();

    let shipped = WzLineItem::find()
        .filter(wz_line_item::Column::OrderLineItemId.is_in(line_ids))
        .all(db)
        .await?;
    let product_ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<i64, product::Model> = Product::find()
        .filter(product::Column::Id.is_in(product_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut chains: BTreeMap<i64, Vec<&order_line_item::Model>> = BTreeMap::new();
    for line in &lines {
        chains.entry(line.chain_root()).or_default().push(line);
    }

    let mut report = Vec::with_capacity(chains.len());
    for (root_line_id, chain) in chains {
        let Some(root) = chain.iter().find(|line| line.id == root_line_id) else {
            continue;
        };
        let dims = products
            .get(&root.product_id)
            .map(Dimensions::from)
            .unwrap_or_default();

        let ordered: Decimal = chain.iter().map(|line| line.quantity).sum();
        let outstanding: Decimal = chain
            .iter()
            .filter(|line| line.status == LineStatus::Open)
            .map(|line| line.quantity)
            .sum();

        let chain_ids: Vec<i64> = chain.iter().map(|line| line.id).collect();
        let mut delivered = Decimal::ZERO;
        let mut wz_document_ids = Vec::new();
        for item in shipped
            .iter()
            .filter(|item| chain_ids.contains(&item.order_line_item_id))
        {
            delivered += convert(item.quantity, item.unit, root.quant_unit, &dims);
            if !wz_document_ids.contains(&item.wz_document_id) {
                wz_document_ids.push(item.wz_document_id);
            }
        }
        wz_document_ids.sort_unstable();

        report.push(LineFulfillment {
            root_line_id,
            product_name: root.product_name.clone(),
            unit: root.quant_unit,
            ordered,
            delivered,
            outstanding,
            wz_document_ids,
        });
    }

    Ok(report)
}

/// One-line text summary, e.g. `Board 1000x600x50: 4/10 m3 delivered (40.0%), 6 m3 open`.
#[must_use]
pub fn format_line_fulfillment(line: &LineFulfillment) -> String {
    format!(
        "{}: {}/{} {} delivered ({}%), {} {} open",
        line.product_name,
        line.delivered.normalize(),
        line.ordered.normalize(),
        line.unit,
        line.delivered_percent(),
        line.outstanding.normalize(),
        line.unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    fn sample(delivered: Decimal, outstanding: Decimal) -> LineFulfillment {
        LineFulfillment {
            root_line_id: 1,
            product_name: "Board 1000x600x50".to_string(),
            unit: Unit::CubicMeter,
            ordered: dec!(10),
            delivered,
            outstanding,
            wz_document_ids: vec![],
        }
    }

    #[test]
    fn test_delivered_percent() {
        assert_eq!(sample(dec!(4), dec!(6)).delivered_percent(), dec!(40.0));
        let mut empty = sample(Decimal::ZERO, Decimal::ZERO);
        empty.ordered = Decimal::ZERO;
        assert_eq!(empty.delivered_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_is_complete() {
        assert!(!sample(dec!(4), dec!(6)).is_complete());
        assert!(sample(dec!(10), Decimal::ZERO).is_complete());
    }

    #[test]
    fn test_format_line_fulfillment() {
        assert_eq!(
            format_line_fulfillment(&sample(dec!(4), dec!(6))),
            "Board 1000x600x50: 4/10 m3 delivered (40.0%), 6 m3 open"
        );
    }

    #[tokio::test]
    async fn test_unshipped_order_reports_everything_outstanding() -> Result<()> {
        let (db, order, product) = setup_with_order().await?;
        let line = create_test_line(&db, order.id, &product, dec!(3), Unit::CubicMeter).await?;
        create_test_line(&db, order.id, &product, dec!(5), Unit::Piece).await?;

        let report = order_fulfillment(&db, order.id).await?;
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].root_line_id, line.id);
        assert_eq!(report[0].ordered, dec!(3));
        assert_eq!(report[0].delivered, Decimal::ZERO);
        assert_eq!(report[0].outstanding, dec!(3));
        assert_eq!(report[1].unit, Unit::Piece);
        assert!(report[1].wz_document_ids.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order() -> Result<()> {
        let db = setup_test_db().await?;
        let result = order_fulfillment(&db, 42).await;
        assert!(matches!(result, Err(Error::OrderNotFound { order_id: 42 })));
        Ok(())
    }
}
