//! Unit conversion engine.
//!
//! Converts a product quantity between cubic meters, pieces and packages using the
//! product's dimensions. Conversions into a discrete unit round up, conversions out of
//! one use the rounded-up count, so m³ → piece → m³ never loses volume. Every other unit
//! pair is independent and passes the quantity through unchanged.
//!
//! Nothing here fails: missing dimensions, negative input and overflow all produce zero.

use crate::entities::{Unit, product};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, Result};

/// Cubic millimeters in one cubic meter.
const MM3_PER_M3: Decimal = dec!(1000000000);

/// Decimal places kept for cubic-meter values.
pub const M3_SCALE: u32 = 3;

/// The physical attributes conversion depends on. Lengths are in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in millimeters
    pub length: Decimal,
    /// Width in millimeters
    pub width: Decimal,
    /// Height in millimeters
    pub height: Decimal,
    /// Pieces per package
    pub quantity_in_package: Decimal,
}

impl Dimensions {
    /// Volume of a single piece in m³, zero when any dimension is missing.
    #[must_use]
    pub fn unit_volume(&self) -> Decimal {
        self.height
            .checked_mul(self.length)
            .and_then(|v| v.checked_mul(self.width))
            .and_then(|v| v.checked_div(MM3_PER_M3))
            .unwrap_or(Decimal::ZERO)
    }

    /// Volume of a full package in m³.
    #[must_use]
    pub fn package_volume(&self) -> Decimal {
        self.unit_volume()
            .checked_mul(self.quantity_in_package)
            .unwrap_or(Decimal::ZERO)
    }
}

impl From<&product::Model> for Dimensions {
    fn from(product: &product::Model) -> Self {
        Self {
            length: product.length,
            width: product.width,
            height: product.height,
            quantity_in_package: product.quantity_in_package,
        }
    }
}

/// Converts `quantity` from `from` into `to` for a product with the given dimensions.
#[must_use]
pub fn convert(quantity: Decimal, from: Unit, to: Unit, dims: &Dimensions) -> Decimal {
    if from == to {
        return quantity;
    }
    match (from, to) {
        (Unit::CubicMeter, Unit::Piece) => into_discrete(quantity, dims.unit_volume()),
        (Unit::Piece, Unit::CubicMeter) => from_discrete_m3(quantity, dims.unit_volume()),
        (Unit::CubicMeter, Unit::Package) => into_discrete(quantity, dims.package_volume()),
        (Unit::Package, Unit::CubicMeter) => from_discrete_m3(quantity, dims.package_volume()),
        (Unit::Piece, Unit::Package) => into_discrete(quantity, dims.quantity_in_package),
        (Unit::Package, Unit::Piece) => {
            if dims.quantity_in_package <= Decimal::ZERO || quantity.is_sign_negative() {
                return Decimal::ZERO;
            }
            quantity
                .ceil()
                .checked_mul(dims.quantity_in_package)
                .map_or(Decimal::ZERO, |pieces| pieces.ceil())
        }
        _ => quantity,
    }
}

/// Rounds an m³ value up to the next whole number of `discrete` units and back.
///
/// The result is the smallest m³ quantity that corresponds to a whole count and is not
/// smaller than `quantity_m3`. Returns the input unchanged for non-discrete units.
#[must_use]
pub fn snap_to_discrete(quantity_m3: Decimal, discrete: Unit, dims: &Dimensions) -> Decimal {
    if !discrete.is_discrete() {
        return quantity_m3;
    }
    let count = convert(quantity_m3, Unit::CubicMeter, discrete, dims);
    convert(count, discrete, Unit::CubicMeter, dims)
}

/// Parses a user-entered quantity. Accepts a decimal comma.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for empty, non-numeric or negative input.
pub fn parse_quantity(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    let value = Decimal::from_str(&normalized).map_err(|_| Error::InvalidQuantity {
        value: input.to_string(),
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::InvalidQuantity {
            value: input.to_string(),
        });
    }
    Ok(value)
}

fn into_discrete(quantity: Decimal, per_unit: Decimal) -> Decimal {
    if per_unit <= Decimal::ZERO || quantity.is_sign_negative() {
        return Decimal::ZERO;
    }
    quantity
        .checked_div(per_unit)
        .map_or(Decimal::ZERO, |count| count.ceil())
}

fn from_discrete_m3(count: Decimal, volume: Decimal) -> Decimal {
    if volume <= Decimal::ZERO || count.is_sign_negative() {
        return Decimal::ZERO;
    }
    count
        .ceil()
        .checked_mul(volume)
        .map_or(Decimal::ZERO, to_m3_scale)
}

fn to_m3_scale(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(M3_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(M3_SCALE);
    rounded
}
