//! Shared test utilities for the WZ tracker.
//!
//! This module provides helpers for setting up test databases, creating test entities
//! with sensible defaults, and stand-in collaborators for the audit log and the ERP.

use crate::{
    core::{
        audit::{AuditEvent, AuditSink},
        conversion::Dimensions,
        draft::{DraftEdit, DraftLine, LineSnapshot, QuantityPair, reconcile},
        erp::ErpBridge,
        fulfillment::{IssuedDocument, WzDraft},
        order::{self, NewOrderLine},
        product::{self, NewProduct},
    },
    entities::{
        self, DocumentType, InclusionState, LineStatus, Unit, order_line_item, wz_document,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, DatabaseConnection, Set};
use std::path::Path;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database under `dir` with a pool of `connections`.
///
/// Use this instead of [`setup_test_db`] when transactions must really overlap: an
/// in-memory database is limited to a single pooled connection.
pub async fn setup_file_db(dir: &Path, connections: u32) -> Result<DatabaseConnection> {
    let url = format!("sqlite://{}?mode=rwc", dir.join("wz.sqlite").display());
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Dimensions of the test board: 1000 x 600 x 50 mm, 8 pieces per package.
///
/// One piece is 0.03 m³, one package 0.24 m³.
#[must_use]
pub fn board_dimensions() -> Dimensions {
    Dimensions {
        length: dec!(1000),
        width: dec!(600),
        height: dec!(50),
        quantity_in_package: dec!(8),
    }
}

/// Creates the test board product.
///
/// # Defaults
/// * dimensions: [`board_dimensions`]
/// * `primary_unit`: m³
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    let dims = board_dimensions();
    product::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            length: dims.length,
            width: dims.width,
            height: dims.height,
            quantity_in_package: dims.quantity_in_package,
            primary_unit: Unit::CubicMeter,
        },
    )
    .await
}

/// Creates an order with a fixed customer.
pub async fn create_test_order(
    db: &DatabaseConnection,
    order_number: &str,
) -> Result<entities::order::Model> {
    order::create_order(db, order_number.to_string(), "Test Customer".to_string()).await
}

/// Adds an order line without a helper unit.
///
/// # Defaults
/// * `unit_price`: 1450
pub async fn create_test_line(
    db: &DatabaseConnection,
    order_id: i64,
    product: &entities::product::Model,
    quantity: Decimal,
    unit: Unit,
) -> Result<order_line_item::Model> {
    order::add_order_line(
        db,
        order_id,
        NewOrderLine {
            product_id: product.id,
            quantity,
            unit,
            helper_unit: None,
            helper_quantity: None,
            unit_price: dec!(1450),
        },
    )
    .await
}

/// Adds an order line with a helper unit; the helper quantity is computed.
pub async fn create_test_line_with_helper(
    db: &DatabaseConnection,
    order_id: i64,
    product: &entities::product::Model,
    quantity: Decimal,
    unit: Unit,
    helper_unit: Unit,
) -> Result<order_line_item::Model> {
    order::add_order_line(
        db,
        order_id,
        NewOrderLine {
            product_id: product.id,
            quantity,
            unit,
            helper_unit: Some(helper_unit),
            helper_quantity: None,
            unit_price: dec!(1450),
        },
    )
    .await
}

/// Inserts a 2 m³ open line pointing at a product id that does not exist.
pub async fn create_line_for_missing_product(
    db: &DatabaseConnection,
    order_id: i64,
    product_id: i64,
) -> Result<order_line_item::Model> {
    let line = order_line_item::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(product_id),
        product_name: Set("Discontinued board".to_string()),
        quantity: Set(dec!(2)),
        quant_unit: Set(Unit::CubicMeter),
        helper_quantity: Set(None),
        help_quant_unit: Set(None),
        unit_price: Set(dec!(900)),
        status: Set(LineStatus::Open),
        inclusion: Set(InclusionState::Unprocessed),
        origin_line_id: Set(None),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    line.insert(db).await.map_err(Into::into)
}

/// Inserts an issued document directly, bypassing numbering.
pub async fn insert_bare_document(
    db: &DatabaseConnection,
    order_id: i64,
    doc_type: DocumentType,
    issue_date: NaiveDate,
    doc_number: i32,
) -> Result<wz_document::Model> {
    let document = wz_document::ActiveModel {
        doc_number: Set(doc_number),
        doc_type: Set(doc_type),
        issue_date: Set(issue_date),
        out_date: Set(issue_date),
        status: Set(wz_document::STATUS_ISSUED.to_string()),
        order_id: Set(order_id),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    document.insert(db).await.map_err(Into::into)
}

/// Sets up a database with the test board and an empty order.
/// Returns (db, order, product).
pub async fn setup_with_order() -> Result<(
    DatabaseConnection,
    entities::order::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Board 1000x600x50").await?;
    let order = create_test_order(&db, "ZAM/1/2026").await?;
    Ok((db, order, product))
}

/// Unselected m³ draft line for the test board, not backed by the database.
#[must_use]
pub fn sample_draft_line(quantity: Decimal) -> DraftLine {
    let snapshot = LineSnapshot {
        line_id: 1,
        product_id: 1,
        product_name: "Board 1000x600x50".to_string(),
        dimensions: board_dimensions(),
        quantity,
        unit: Unit::CubicMeter,
        helper_quantity: None,
        helper_unit: None,
        resting_state: InclusionState::Unprocessed,
    };
    let wz = QuantityPair::from(&snapshot);
    DraftLine {
        line: snapshot,
        selected: false,
        wz,
    }
}

/// Selects `line` and types `quantity` into it.
#[must_use]
pub fn select_line(line: &DraftLine, quantity: Decimal) -> DraftLine {
    let selected = reconcile(line, DraftEdit::Select);
    reconcile(&selected, DraftEdit::Quantity(quantity))
}

/// WZ draft issued and leaving on 2026-10-15.
#[must_use]
pub fn test_draft(order_id: i64, lines: Vec<DraftLine>) -> WzDraft {
    let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap_or_default();
    WzDraft {
        order_id,
        doc_type: DocumentType::Wz,
        issue_date: date,
        out_date: date,
        lines,
    }
}

/// Issued document with no lines, for collaborator tests.
#[must_use]
pub fn sample_issued_document(doc_type: DocumentType) -> IssuedDocument {
    let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap_or_default();
    IssuedDocument {
        document: wz_document::Model {
            id: 1,
            doc_number: 1,
            doc_type,
            issue_date: date,
            out_date: date,
            status: wz_document::STATUS_ISSUED.to_string(),
            order_id: 1,
            created_at: chrono::Utc::now().naive_utc(),
        },
        lines: vec![],
        remainders: vec![],
        skipped_line_ids: vec![],
    }
}

/// Audit sink that drops every event.
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn log_event(&self, _event: AuditEvent) -> Result<()> {
        Ok(())
    }
}

/// Audit sink that rejects every event.
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn log_event(&self, _event: AuditEvent) -> Result<()> {
        Err(Error::External {
            service: "audit".to_string(),
            message: "audit log unavailable".to_string(),
        })
    }
}

/// ERP bridge answering every push the same way.
pub struct StaticErpBridge(std::result::Result<String, String>);

impl StaticErpBridge {
    /// Accepts every push with `external_id`.
    #[must_use]
    pub fn ok(external_id: &str) -> Self {
        Self(Ok(external_id.to_string()))
    }

    /// Rejects every push with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self(Err(message.to_string()))
    }
}

#[async_trait]
impl ErpBridge for StaticErpBridge {
    async fn push_document(&self, _issued: &IssuedDocument) -> Result<String> {
        self.0.clone().map_err(|message| Error::External {
            service: "erp".to_string(),
            message,
        })
    }
}
