/// Audit log sink
pub mod audit;
/// Quantity conversion between units
pub mod conversion;
/// Draft WZ lines and their reconciliation
pub mod draft;
/// ERP bridge
pub mod erp;
/// WZ document issuance
pub mod fulfillment;
/// Monthly document numbering
pub mod numbering;
/// Orders and order lines
pub mod order;
/// Product catalog access
pub mod product;
/// VAT registry lookup and NIP validation
pub mod registry;
/// Fulfillment reporting
pub mod report;
/// Unit classification and default helper units
pub mod units;
