//! Unit pairing policy.
//!
//! Which units can be converted into each other, and which helper unit a primary unit
//! gets when the user has not chosen one. The pairing lives in one table so the policy
//! can be read and tested on its own.

use crate::entities::Unit;

/// Default helper unit for each primary unit that has one.
pub const DEFAULT_HELPER_PAIRS: &[(Unit, Unit)] = &[
    (Unit::CubicMeter, Unit::Package),
    (Unit::Piece, Unit::CubicMeter),
    (Unit::Package, Unit::CubicMeter),
];

impl Unit {
    /// Piece and package counts are whole numbers; they are always rounded up.
    #[must_use]
    pub const fn is_discrete(self) -> bool {
        matches!(self, Self::Piece | Self::Package)
    }

    /// Whether the unit takes part in dimension-based conversion at all.
    #[must_use]
    pub const fn is_dimensional(self) -> bool {
        matches!(self, Self::CubicMeter | Self::Piece | Self::Package)
    }

    /// Whether `self` and `other` are distinct units linked through product dimensions.
    #[must_use]
    pub fn is_convertible_with(self, other: Self) -> bool {
        self != other && self.is_dimensional() && other.is_dimensional()
    }

    /// Helper unit assigned when a line switches to `self` without one.
    #[must_use]
    pub fn default_helper(self) -> Option<Self> {
        DEFAULT_HELPER_PAIRS
            .iter()
            .find(|(primary, _)| *primary == self)
            .map(|(_, helper)| *helper)
    }
}
