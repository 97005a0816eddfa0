//! Unified error type for the WZ tracker.
//!
//! Validation errors are raised before anything touches the database. Failures inside
//! the issuing transaction are wrapped in [`Error::DocumentRolledBack`] so callers see a
//! single failure for the whole document.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::entities::Unit;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any error reported by `SeaORM` or the underlying driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization failure, e.g. for audit payloads
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Integer conversion overflow
    #[error("Numeric conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Quantity is not a non-negative decimal, or is zero where a positive value is needed
    #[error("Invalid quantity: {value}")]
    InvalidQuantity {
        /// The offending input as typed or computed
        value: String,
    },

    /// Unit code not in the supported set
    #[error("Unknown unit: {code}")]
    UnknownUnit {
        /// The unrecognized code
        code: String,
    },

    /// Requested quantity on a selected line is larger than what is still owed
    #[error("Line {line_id}: requested {requested} {unit} exceeds remaining {remaining} {unit}")]
    QuantityExceedsRemaining {
        /// Order line being shipped
        line_id: i64,
        /// Quantity requested in the draft
        requested: Decimal,
        /// Largest allowed quantity in the same unit
        remaining: Decimal,
        /// Unit both values are expressed in
        unit: Unit,
    },

    /// A WZ draft without any line to ship
    #[error("WZ document has no lines to issue")]
    EmptyDocument,

    /// Order lookup failed
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// Requested order id
        order_id: i64,
    },

    /// Product lookup failed
    #[error("Product not found: {product_id}")]
    ProductNotFound {
        /// Requested product id
        product_id: i64,
    },

    /// Order line lookup failed
    #[error("Order line not found: {line_id}")]
    LineNotFound {
        /// Requested line id
        line_id: i64,
    },

    /// Order line was already consumed by another WZ document
    #[error("Order line {line_id} is no longer open")]
    LineNotOpen {
        /// Line that was already consumed
        line_id: i64,
    },

    /// Draft line no longer matches the stored order line
    #[error("Order line {line_id} changed since the draft was loaded")]
    StaleDraftLine {
        /// Line whose draft snapshot is out of date
        line_id: i64,
    },

    /// Date arithmetic produced an out-of-range value
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// What went wrong
        message: String,
    },

    /// Tax identifier failed format or checksum validation
    #[error("Invalid NIP: {nip}")]
    InvalidTaxId {
        /// The identifier as supplied
        nip: String,
    },

    /// Failure reported by an external collaborator (ERP, VAT registry)
    #[error("{service} error: {message}")]
    External {
        /// Collaborator name
        service: String,
        /// Description returned by the collaborator
        message: String,
    },

    /// The issuing transaction failed and was rolled back as a whole
    #[error("WZ document was not created: {source}")]
    DocumentRolledBack {
        /// The failure that aborted the transaction
        source: Box<Error>,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
