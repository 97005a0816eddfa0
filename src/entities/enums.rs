//! Enumerated column types shared by several tables.
//!
//! These replace the nullable booleans of the legacy schema: a line's position in the
//! WZ workflow is an [`InclusionState`], whether it still owes goods is a [`LineStatus`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Unit of measure for a quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Unit {
    /// Cubic meter
    #[sea_orm(string_value = "m3")]
    #[serde(rename = "m3")]
    CubicMeter,
    /// Square meter
    #[sea_orm(string_value = "m2")]
    #[serde(rename = "m2")]
    SquareMeter,
    /// Package of `quantity_in_package` pieces
    #[sea_orm(string_value = "opak")]
    #[serde(rename = "opak")]
    Package,
    /// Linear meter
    #[sea_orm(string_value = "mb")]
    #[serde(rename = "mb")]
    LinearMeter,
    /// Set
    #[sea_orm(string_value = "kpl")]
    #[serde(rename = "kpl")]
    Set,
    /// Kilogram
    #[sea_orm(string_value = "kg")]
    #[serde(rename = "kg")]
    Kilogram,
    /// Single piece
    #[sea_orm(string_value = "szt")]
    #[serde(rename = "szt")]
    Piece,
    /// Tonne
    #[sea_orm(string_value = "t")]
    #[serde(rename = "t")]
    Tonne,
}

impl Unit {
    /// Short code used in storage and documents.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CubicMeter => "m3",
            Self::SquareMeter => "m2",
            Self::Package => "opak",
            Self::LinearMeter => "mb",
            Self::Set => "kpl",
            Self::Kilogram => "kg",
            Self::Piece => "szt",
            Self::Tonne => "t",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m3" | "m³" => Ok(Self::CubicMeter),
            "m2" | "m²" => Ok(Self::SquareMeter),
            "opak" | "op" => Ok(Self::Package),
            "mb" => Ok(Self::LinearMeter),
            "kpl" => Ok(Self::Set),
            "kg" => Ok(Self::Kilogram),
            "szt" => Ok(Self::Piece),
            "t" => Ok(Self::Tonne),
            _ => Err(Error::UnknownUnit { code: s.to_string() }),
        }
    }
}

/// Where an order line stands in the WZ workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum InclusionState {
    /// Never processed into a WZ document
    #[sea_orm(string_value = "unprocessed")]
    Unprocessed,
    /// Shipped on a WZ document
    #[sea_orm(string_value = "selected")]
    Selected,
    /// Balance left after a partial shipment, still awaiting delivery
    #[sea_orm(string_value = "remainder")]
    Remainder,
}

/// Whether an order line still owes goods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LineStatus {
    /// Available for a future WZ document
    #[sea_orm(string_value = "open")]
    Open,
    /// Absorbed into a WZ document; superseded by a remainder line if anything is left
    #[sea_orm(string_value = "consumed")]
    Consumed,
}

/// Kind of warehouse document. Each kind is numbered independently per month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DocumentType {
    /// External goods issue (delivery note)
    #[sea_orm(string_value = "WZ")]
    #[serde(rename = "WZ")]
    Wz,
    /// Corrective goods issue
    #[sea_orm(string_value = "WZK")]
    #[serde(rename = "WZK")]
    WzCorrection,
    /// Inter-warehouse transfer
    #[sea_orm(string_value = "MM")]
    #[serde(rename = "MM")]
    Transfer,
    /// Internal issue
    #[sea_orm(string_value = "RW")]
    #[serde(rename = "RW")]
    InternalIssue,
}

impl DocumentType {
    /// Prefix printed in front of the document number.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Wz => "WZ",
            Self::WzCorrection => "WZK",
            Self::Transfer => "MM",
            Self::InternalIssue => "RW",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
