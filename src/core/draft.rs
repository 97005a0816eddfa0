//! Draft WZ lines and their reconciliation.
//!
//! A [`DraftLine`] is an open order line as the WZ form sees it: a snapshot of what is
//! still owed plus the editable quantity pair being shipped. Every user action is an
//! explicit [`DraftEdit`] applied through [`reconcile`], which returns the updated line
//! with the helper quantity recomputed and the shipped quantity clamped to what is
//! still owed.

use crate::{
    core::conversion::{Dimensions, convert, snap_to_discrete},
    entities::{
        InclusionState, LineStatus, Order, OrderLineItem, Product, Unit, order_line_item, product,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// The open order line a draft line was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSnapshot {
    /// Order line id
    pub line_id: i64,
    /// Product shipped on the line
    pub product_id: i64,
    /// Product name snapshot
    pub product_name: String,
    /// Dimensions used for conversion; zero when the product is unknown
    pub dimensions: Dimensions,
    /// Quantity still owed, in `unit`
    pub quantity: Decimal,
    /// Primary unit of the order line
    pub unit: Unit,
    /// Stored helper quantity
    pub helper_quantity: Option<Decimal>,
    /// Stored helper unit
    pub helper_unit: Option<Unit>,
    /// State the line returns to when deselected
    pub resting_state: InclusionState,
}

/// Quantity pair edited on the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityPair {
    /// Quantity being shipped
    pub quantity: Decimal,
    /// Unit of `quantity`
    pub unit: Unit,
    /// Same amount in `helper_unit`
    pub helper_quantity: Option<Decimal>,
    /// Secondary unit
    pub helper_unit: Option<Unit>,
}

impl From<&LineSnapshot> for QuantityPair {
    fn from(line: &LineSnapshot) -> Self {
        Self {
            quantity: line.quantity,
            unit: line.unit,
            helper_quantity: line.helper_quantity,
            helper_unit: line.helper_unit,
        }
    }
}

/// One line of a WZ draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftLine {
    /// What the order line still owes
    pub line: LineSnapshot,
    /// Whether the line is shipped on this draft
    pub selected: bool,
    /// Editable quantities
    pub wz: QuantityPair,
}

/// A single user action on a draft line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftEdit {
    /// Tick the line for shipping
    Select,
    /// Untick the line
    Deselect,
    /// Type a new shipped quantity
    Quantity(Decimal),
    /// Leave the quantity field
    Blur,
    /// Pick another unit for the shipped quantity
    Unit(Unit),
    /// Pick or clear the helper unit
    HelperUnit(Option<Unit>),
    /// Type a new helper quantity
    HelperQuantity(Decimal),
}

impl DraftLine {
    /// Builds an unselected draft line from an order line and its product, if known.
    #[must_use]
    pub fn new(line: &order_line_item::Model, product: Option<&product::Model>) -> Self {
        let resting_state = if line.inclusion == InclusionState::Remainder {
            InclusionState::Remainder
        } else {
            InclusionState::Unprocessed
        };
        let snapshot = LineSnapshot {
            line_id: line.id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            dimensions: product.map(Dimensions::from).unwrap_or_default(),
            quantity: line.quantity,
            unit: line.quant_unit,
            helper_quantity: line.helper_quantity,
            helper_unit: line.help_quant_unit,
            resting_state,
        };
        let wz = QuantityPair::from(&snapshot);
        Self {
            line: snapshot,
            selected: false,
            wz,
        }
    }

    /// State shown next to the line on the form.
    #[must_use]
    pub const fn state(&self) -> InclusionState {
        if self.selected {
            InclusionState::Selected
        } else {
            self.line.resting_state
        }
    }

    /// Largest quantity that may be shipped, expressed in the currently selected unit.
    ///
    /// For a line ordered in m³ and shipped in m³ with a discrete helper, the limit is the
    /// owed volume rounded up to whole pieces or packages, so a snapped value never
    /// exceeds it. Lines ordered in any other unit never get more than they owe.
    #[must_use]
    pub fn remaining_limit(&self) -> Decimal {
        let dims = &self.line.dimensions;
        let limit = convert(self.line.quantity, self.line.unit, self.wz.unit, dims);
        match self.snap_helper() {
            Some(helper) if self.line.unit == Unit::CubicMeter => {
                snap_to_discrete(limit, helper, dims)
            }
            _ => limit,
        }
    }

    /// Shipped quantity expressed in the order line's own unit.
    #[must_use]
    pub fn quantity_in_line_unit(&self) -> Decimal {
        convert(
            self.wz.quantity,
            self.wz.unit,
            self.line.unit,
            &self.line.dimensions,
        )
    }

    /// Checks a selected line before anything is written.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] for a zero quantity and
    /// [`Error::QuantityExceedsRemaining`] when more is shipped than is owed.
    pub fn validate(&self) -> Result<()> {
        if self.wz.quantity <= Decimal::ZERO {
            return Err(Error::InvalidQuantity {
                value: self.wz.quantity.to_string(),
            });
        }
        let remaining = self.remaining_limit();
        if self.wz.quantity > remaining {
            return Err(Error::QuantityExceedsRemaining {
                line_id: self.line.line_id,
                requested: self.wz.quantity,
                remaining,
                unit: self.wz.unit,
            });
        }
        Ok(())
    }

    fn clamp(&mut self) {
        let limit = self.remaining_limit();
        self.wz.quantity = self.wz.quantity.max(Decimal::ZERO).min(limit);
    }

    /// Discrete helper the shipped m³ quantity snaps to on blur.
    fn snap_helper(&self) -> Option<Unit> {
        self.wz
            .helper_unit
            .filter(|helper| self.wz.unit == Unit::CubicMeter && helper.is_discrete())
    }

    fn paired_helper(&self) -> Option<Unit> {
        self.wz
            .helper_unit
            .filter(|helper| self.wz.unit.is_convertible_with(*helper))
    }

    fn recompute_helper(&mut self) {
        if let Some(helper) = self.paired_helper() {
            self.wz.helper_quantity = Some(convert(
                self.wz.quantity,
                self.wz.unit,
                helper,
                &self.line.dimensions,
            ));
        }
    }
}

/// Applies one edit to a draft line and returns the reconciled line.
///
/// Edits other than [`DraftEdit::Select`] are ignored on lines that are not selected.
#[must_use]
pub fn reconcile(line: &DraftLine, edit: DraftEdit) -> DraftLine {
    let mut next = line.clone();
    if !next.selected && edit != DraftEdit::Select {
        return next;
    }

    match edit {
        DraftEdit::Select => {
            next.selected = true;
            next.wz = QuantityPair::from(&next.line);
        }
        DraftEdit::Deselect => {
            next.selected = false;
            next.wz = QuantityPair::from(&next.line);
        }
        DraftEdit::Quantity(quantity) => {
            next.wz.quantity = quantity;
            next.clamp();
            next.recompute_helper();
        }
        DraftEdit::Blur => {
            if let Some(helper) = next.snap_helper() {
                let dims = next.line.dimensions;
                let mut count = convert(next.wz.quantity, Unit::CubicMeter, helper, &dims);
                let mut snapped = convert(count, helper, Unit::CubicMeter, &dims);
                // Rounding up would pass the limit: fall back to the whole count below
                if snapped > next.remaining_limit() && count > Decimal::ZERO {
                    count -= Decimal::ONE;
                    snapped = convert(count, helper, Unit::CubicMeter, &dims);
                }
                next.wz.quantity = snapped;
                next.wz.helper_quantity = Some(count);
            }
            next.clamp();
        }
        DraftEdit::Unit(unit) => {
            if unit != next.wz.unit {
                next.wz.quantity =
                    convert(next.wz.quantity, next.wz.unit, unit, &next.line.dimensions);
                next.wz.unit = unit;
                if next.wz.helper_unit.is_none_or(|helper| helper == unit) {
                    next.wz.helper_unit = unit.default_helper();
                    if next.wz.helper_unit.is_none() {
                        next.wz.helper_quantity = None;
                    }
                }
                next.clamp();
                next.recompute_helper();
            }
        }
        DraftEdit::HelperUnit(helper_unit) => {
            next.wz.helper_unit = helper_unit;
            if helper_unit.is_none() {
                next.wz.helper_quantity = None;
            }
            next.clamp();
            next.recompute_helper();
        }
        DraftEdit::HelperQuantity(helper_quantity) => {
            let helper_quantity = helper_quantity.max(Decimal::ZERO);
            if let Some(helper) = next.paired_helper() {
                next.wz.quantity = convert(
                    helper_quantity,
                    helper,
                    next.wz.unit,
                    &next.line.dimensions,
                );
                next.clamp();
                next.recompute_helper();
            } else if next.wz.helper_unit.is_some() {
                next.wz.helper_quantity = Some(helper_quantity);
            }
        }
    }
    next
}

/// Loads the open lines of an order as draft lines, oldest first.
///
/// This is what the WZ form renders: every line still owing goods, tagged
/// `Unprocessed` or `Remainder`, with its dimensions resolved for conversion.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] for an unknown order, or a database error.
pub async fn load_draft(db: &DatabaseConnection, order_id: i64) -> Result<Vec<DraftLine>> {
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { order_id })?;

    let lines = OrderLineItem::find()
        .filter(order_line_item::Column::OrderId.eq(order_id))
        .filter(order_line_item::Column::Status.eq(LineStatus::Open))
        .order_by_asc(order_line_item::Column::Id)
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

    Ok(lines
        .iter()
        .map(|line| DraftLine::new(line, products.get(&line.product_id)))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    fn board_line(quantity: Decimal, unit: Unit, helper_unit: Option<Unit>) -> DraftLine {
        let snapshot = LineSnapshot {
            line_id: 1,
            product_id: 1,
            product_name: "Board 1000x600x50".to_string(),
            dimensions: board_dimensions(),
            quantity,
            unit,
            helper_quantity: None,
            helper_unit,
            resting_state: InclusionState::Unprocessed,
        };
        let wz = QuantityPair::from(&snapshot);
        DraftLine {
            line: snapshot,
            selected: false,
            wz,
        }
    }

    #[test]
    fn test_select_copies_remaining_quantity() {
        let mut line = board_line(dec!(10), Unit::CubicMeter, Some(Unit::Package));
        line.line.helper_quantity = Some(dec!(42));
        let selected = reconcile(&line, DraftEdit::Select);
        assert!(selected.selected);
        assert_eq!(selected.state(), InclusionState::Selected);
        assert_eq!(selected.wz.quantity, dec!(10));
        assert_eq!(selected.wz.helper_quantity, Some(dec!(42)));
    }

    #[test]
    fn test_deselect_restores_resting_state() {
        let mut line = board_line(dec!(10), Unit::CubicMeter, None);
        line.line.resting_state = InclusionState::Remainder;
        let edited = reconcile(&reconcile(&line, DraftEdit::Select), DraftEdit::Quantity(dec!(3)));
        let deselected = reconcile(&edited, DraftEdit::Deselect);
        assert_eq!(deselected.state(), InclusionState::Remainder);
        assert_eq!(deselected.wz.quantity, dec!(10));
    }

    #[test]
    fn test_edits_ignored_when_not_selected() {
        let line = board_line(dec!(10), Unit::CubicMeter, None);
        let edited = reconcile(&line, DraftEdit::Quantity(dec!(3)));
        assert_eq!(edited, line);
    }

    #[test]
    fn test_quantity_edit_recomputes_helper_without_snapping() {
        let line = reconcile(
            &board_line(dec!(10), Unit::CubicMeter, Some(Unit::Piece)),
            DraftEdit::Select,
        );
        let edited = reconcile(&line, DraftEdit::Quantity(dec!(1)));
        assert_eq!(edited.wz.quantity, dec!(1));
        assert_eq!(edited.wz.helper_quantity, Some(dec!(34)));
    }

    #[test]
    fn test_quantity_edit_is_clamped_to_remaining() {
        let line = reconcile(&board_line(dec!(10), Unit::CubicMeter, None), DraftEdit::Select);
        let edited = reconcile(&line, DraftEdit::Quantity(dec!(12)));
        assert_eq!(edited.wz.quantity, dec!(10));
    }

    #[test]
    fn test_blur_snaps_to_whole_pieces() {
        let line = reconcile(
            &board_line(dec!(10), Unit::CubicMeter, Some(Unit::Piece)),
            DraftEdit::Select,
        );
        let typed = reconcile(&line, DraftEdit::Quantity(dec!(1)));
        let blurred = reconcile(&typed, DraftEdit::Blur);
        assert_eq!(blurred.wz.quantity.to_string(), "1.020");
        assert_eq!(blurred.wz.helper_quantity, Some(dec!(34)));
    }

    #[test]
    fn test_blur_is_idempotent() {
        let line = reconcile(
            &board_line(dec!(10), Unit::CubicMeter, Some(Unit::Package)),
            DraftEdit::Select,
        );
        let once = reconcile(&reconcile(&line, DraftEdit::Quantity(dec!(2.5))), DraftEdit::Blur);
        let twice = reconcile(&once, DraftEdit::Blur);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_blur_never_widens_limit_of_piece_line() {
        let line = reconcile(&board_line(dec!(10), Unit::Piece, None), DraftEdit::Select);
        let switched = reconcile(&line, DraftEdit::Unit(Unit::CubicMeter));
        assert_eq!(switched.wz.quantity.to_string(), "0.300");
        assert_eq!(switched.wz.helper_unit, Some(Unit::Package));
        assert_eq!(switched.remaining_limit().to_string(), "0.300");

        // Two packages would be 16 pieces; one package is the most that fits in 10
        let blurred = reconcile(&switched, DraftEdit::Blur);
        assert_eq!(blurred.wz.quantity.to_string(), "0.240");
        assert_eq!(blurred.wz.helper_quantity, Some(dec!(1)));
        assert!(blurred.validate().is_ok());
        assert_eq!(blurred.quantity_in_line_unit(), dec!(8));
    }

    #[test]
    fn test_unit_switch_to_package_scenario() {
        let line = reconcile(&board_line(dec!(1), Unit::CubicMeter, None), DraftEdit::Select);
        let switched = reconcile(&line, DraftEdit::Unit(Unit::Package));
        assert_eq!(switched.wz.quantity, dec!(5));
        assert_eq!(switched.wz.unit, Unit::Package);
        assert_eq!(switched.wz.helper_unit, Some(Unit::CubicMeter));
        assert_eq!(switched.wz.helper_quantity.unwrap().to_string(), "1.200");
        assert!(switched.validate().is_ok());
    }

    #[test]
    fn test_helper_package_then_blur_persists_snapped_m3() {
        let line = reconcile(&board_line(dec!(1), Unit::CubicMeter, None), DraftEdit::Select);
        let paired = reconcile(&line, DraftEdit::HelperUnit(Some(Unit::Package)));
        assert_eq!(paired.wz.helper_quantity, Some(dec!(5)));
        let blurred = reconcile(&paired, DraftEdit::Blur);
        assert_eq!(blurred.wz.quantity.to_string(), "1.200");
        assert_eq!(blurred.wz.helper_quantity, Some(dec!(5)));
        assert!(blurred.validate().is_ok());
    }

    #[test]
    fn test_unit_switch_assigns_default_pairing() {
        let line = reconcile(&board_line(dec!(3), Unit::Package, None), DraftEdit::Select);
        let switched = reconcile(&line, DraftEdit::Unit(Unit::CubicMeter));
        assert_eq!(switched.wz.quantity.to_string(), "0.720");
        assert_eq!(switched.wz.helper_unit, Some(Unit::Package));
        assert_eq!(switched.wz.helper_quantity, Some(dec!(3)));
    }

    #[test]
    fn test_unit_switch_keeps_independent_helper() {
        let mut line = board_line(dec!(4), Unit::Kilogram, Some(Unit::Set));
        line.line.helper_quantity = Some(dec!(2));
        let selected = reconcile(&line, DraftEdit::Select);
        let switched = reconcile(&selected, DraftEdit::Unit(Unit::Tonne));
        assert_eq!(switched.wz.quantity, dec!(4));
        assert_eq!(switched.wz.helper_unit, Some(Unit::Set));
        assert_eq!(switched.wz.helper_quantity, Some(dec!(2)));
    }

    #[test]
    fn test_helper_quantity_drives_primary_for_convertible_pair() {
        let line = reconcile(
            &board_line(dec!(10), Unit::CubicMeter, Some(Unit::Package)),
            DraftEdit::Select,
        );
        let edited = reconcile(&line, DraftEdit::HelperQuantity(dec!(3)));
        assert_eq!(edited.wz.quantity.to_string(), "0.720");
        assert_eq!(edited.wz.helper_quantity, Some(dec!(3)));
    }

    #[test]
    fn test_helper_quantity_stored_for_independent_pair() {
        let line = reconcile(
            &board_line(dec!(5), Unit::Kilogram, Some(Unit::Set)),
            DraftEdit::Select,
        );
        let edited = reconcile(&line, DraftEdit::HelperQuantity(dec!(7)));
        assert_eq!(edited.wz.quantity, dec!(5));
        assert_eq!(edited.wz.helper_quantity, Some(dec!(7)));
    }

    #[test]
    fn test_validate_rejects_excess_and_zero() {
        let mut line = reconcile(&board_line(dec!(10), Unit::CubicMeter, None), DraftEdit::Select);
        line.wz.quantity = dec!(11);
        assert!(matches!(
            line.validate(),
            Err(Error::QuantityExceedsRemaining { line_id: 1, .. })
        ));
        line.wz.quantity = Decimal::ZERO;
        assert!(matches!(line.validate(), Err(Error::InvalidQuantity { .. })));
    }

    #[test]
    fn test_zero_dimensions_clamp_to_zero_in_discrete_unit() {
        let mut line = board_line(dec!(2), Unit::CubicMeter, None);
        line.line.dimensions = Dimensions::default();
        let switched = reconcile(&reconcile(&line, DraftEdit::Select), DraftEdit::Unit(Unit::Piece));
        assert_eq!(switched.wz.quantity, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_load_draft_lists_open_lines() -> Result<()> {
        let (db, order, product) = setup_with_order().await?;
        let line = create_test_line(&db, order.id, &product, dec!(10), Unit::CubicMeter).await?;

        let draft = load_draft(&db, order.id).await?;
        assert_eq!(draft.len(), 1);
        assert_eq!(draft[0].line.line_id, line.id);
        assert_eq!(draft[0].state(), InclusionState::Unprocessed);
        assert_eq!(draft[0].line.dimensions, board_dimensions());
        assert_eq!(draft[0].remaining_limit(), dec!(10));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_draft_unknown_order() -> Result<()> {
        let db = setup_test_db().await?;
        let result = load_draft(&db, 404).await;
        assert!(matches!(result, Err(Error::OrderNotFound { order_id: 404 })));
        Ok(())
    }
}
