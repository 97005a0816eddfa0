//! VAT registry lookup.
//!
//! Customers are identified by their Polish tax number (NIP). The registry itself is an
//! external service reached through [`CompanyRegistry`]; this module only validates the
//! number and maps the registry's answer onto the customer form.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Checksum weights for the first nine NIP digits.
const NIP_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

/// Collaborator name used in [`Error::External`].
pub const REGISTRY_SERVICE: &str = "vat-registry";

/// Company data returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Normalized NIP
    pub nip: String,
    /// Registered company name
    pub name: String,
    /// Street and building number
    pub street: String,
    /// Postal code
    pub postal_code: String,
    /// City
    pub city: String,
    /// Whether the company is an active VAT payer
    pub vat_active: bool,
}

/// Lookup service for registered companies.
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Looks up a company by a normalized NIP.
    async fn lookup(&self, nip: &str) -> Result<CompanyRecord>;
}

/// Customer fields filled in from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPrefill {
    /// Normalized NIP
    pub nip: String,
    /// Customer name
    pub name: String,
    /// Single-line address, `street, postal_code city`
    pub address: String,
    /// Whether the customer is an active VAT payer
    pub vat_active: bool,
}

impl From<CompanyRecord> for CustomerPrefill {
    fn from(record: CompanyRecord) -> Self {
        let address = format!("{}, {} {}", record.street, record.postal_code, record.city);
        Self {
            nip: record.nip,
            name: record.name,
            address: address.trim_matches([',', ' ']).to_string(),
            vat_active: record.vat_active,
        }
    }
}

/// Strips the `PL` prefix and separators and validates the checksum.
///
/// # Errors
/// Returns [`Error::InvalidTaxId`] unless the result is ten digits with a valid checksum.
pub fn normalize_nip(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("PL")
        .or_else(|| trimmed.strip_prefix("pl"))
        .unwrap_or(trimmed);
    let nip: String = without_prefix
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    let invalid = || Error::InvalidTaxId {
        nip: raw.to_string(),
    };
    let digits: Vec<u32> = nip
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;
    if digits.len() != 10 {
        return Err(invalid());
    }

    let checksum = NIP_WEIGHTS
        .iter()
        .zip(&digits)
        .map(|(weight, digit)| weight * digit)
        .sum::<u32>()
        % 11;
    // A remainder of 10 can never match a single digit
    if checksum != digits[9] {
        return Err(invalid());
    }
    Ok(nip)
}

/// Validates `raw_nip` and fetches the customer data for it.
///
/// # Errors
/// Returns [`Error::InvalidTaxId`] for a malformed number, or [`Error::External`] when
/// the registry lookup fails.
#[instrument(skip(registry))]
pub async fn prefill_customer(
    registry: &dyn CompanyRegistry,
    raw_nip: &str,
) -> Result<CustomerPrefill> {
    let nip = normalize_nip(raw_nip)?;
    let record = registry
        .lookup(&nip)
        .await
        .map_err(|e| match e {
            Error::External { .. } => e,
            other => Error::External {
                service: REGISTRY_SERVICE.to_string(),
                message: other.to_string(),
            },
        })?;
    debug!(%nip, name = %record.name, "Customer found in registry");
    Ok(record.into())
}
