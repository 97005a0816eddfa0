//! WZ document issuance.
//!
//! Turns a validated draft into one WZ document inside a single database transaction:
//! the document row, a snapshot per shipped line, the shipped order lines marked
//! consumed, and one remainder line for every partially shipped line. Either all of it
//! is committed or none of it is.

use crate::{
    config::settings::ErpSettings,
    core::{
        audit::{AuditEvent, AuditSink, record_best_effort},
        conversion::{Dimensions, convert},
        draft::DraftLine,
        erp::{ErpBridge, ErpPush, push_best_effort},
        numbering::{allocate_document_number, format_document_number},
    },
    entities::{
        DocumentType, InclusionState, LineStatus, OrderLineItem, Product, Unit,
        order_line_item, wz_document, wz_line_item,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Entity name used in audit records for WZ documents.
pub const AUDIT_ENTITY: &str = "wz_document";

/// A WZ document ready to be issued.
#[derive(Debug, Clone, PartialEq)]
pub struct WzDraft {
    /// Order being fulfilled
    pub order_id: i64,
    /// Document kind; selects the numbering bucket
    pub doc_type: DocumentType,
    /// Issue date; selects the numbering month
    pub issue_date: NaiveDate,
    /// Date the goods leave the warehouse
    pub out_date: NaiveDate,
    /// All draft lines of the order; only selected ones are shipped
    pub lines: Vec<DraftLine>,
}

impl WzDraft {
    /// Lines ticked for shipping.
    pub fn selected_lines(&self) -> impl Iterator<Item = &DraftLine> {
        self.lines.iter().filter(|line| line.selected)
    }

    /// Checks every selected line without touching the database.
    ///
    /// # Errors
    /// Returns [`Error::EmptyDocument`] when nothing is selected, otherwise the first
    /// line validation error.
    pub fn validate(&self) -> Result<()> {
        let mut any = false;
        for line in self.selected_lines() {
            line.validate()?;
            any = true;
        }
        if any { Ok(()) } else { Err(Error::EmptyDocument) }
    }
}

/// Everything written by a successful issuance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedDocument {
    /// The new document
    pub document: wz_document::Model,
    /// Consumed line snapshots printed on the document
    pub lines: Vec<wz_line_item::Model>,
    /// Remainder lines created for partially shipped lines
    pub remainders: Vec<order_line_item::Model>,
    /// Selected lines left out because their product no longer exists
    pub skipped_line_ids: Vec<i64>,
}

/// External collaborators notified after a document is committed.
#[derive(Clone)]
pub struct Collaborators {
    /// Audit log destination
    pub audit: Arc<dyn AuditSink>,
    /// ERP client, if the integration is wired in
    pub erp: Option<Arc<dyn ErpBridge>>,
}

/// Result of [`issue_document`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueOutcome {
    /// The committed document
    pub issued: IssuedDocument,
    /// What happened when mirroring it into the ERP
    pub erp: ErpPush,
}

/// Issues a WZ document for the selected lines of `draft`.
///
/// Validation runs before any database call, then again inside the transaction against
/// the stored order line and product, so a stale draft cannot ship more than is owed.
/// Failures inside the transaction are returned as [`Error::DocumentRolledBack`]. The audit event is written after commit
/// and cannot fail the issuance.
///
/// # Errors
/// Validation errors for bad quantities or an empty draft, or
/// [`Error::DocumentRolledBack`] wrapping the persistence failure.
#[instrument(skip(db, audit, draft), fields(order_id = draft.order_id, doc_type = %draft.doc_type))]
pub async fn create_wz_document(
    db: &DatabaseConnection,
    audit: &dyn AuditSink,
    draft: &WzDraft,
) -> Result<IssuedDocument> {
    draft.validate()?;

    let txn = db.begin().await.map_err(rolled_back)?;
    let issued = write_document(&txn, draft).await.map_err(rolled_back)?;
    txn.commit().await.map_err(rolled_back)?;

    let name = format_document_number(&issued.document);
    info!(
        document = %name,
        lines = issued.lines.len(),
        remainders = issued.remainders.len(),
        skipped = issued.skipped_line_ids.len(),
        "WZ document issued"
    );

    let changed_data = serde_json::json!({
        "order_id": draft.order_id,
        "line_item_ids": issued.lines.iter().map(|line| line.id).collect::<Vec<_>>(),
        "remainder_line_ids": issued.remainders.iter().map(|line| line.id).collect::<Vec<_>>(),
        "skipped_line_ids": issued.skipped_line_ids,
    });
    record_best_effort(
        audit,
        AuditEvent::created(AUDIT_ENTITY, issued.document.id, name, Some(changed_data)),
    )
    .await;

    Ok(issued)
}

/// Issues a document and mirrors it into the ERP when configured.
///
/// The ERP push runs after commit; its failure is reported in the outcome, never as an
/// error.
///
/// # Errors
/// Same as [`create_wz_document`].
pub async fn issue_document(
    db: &DatabaseConnection,
    collaborators: &Collaborators,
    erp_settings: &ErpSettings,
    draft: &WzDraft,
) -> Result<IssueOutcome> {
    let issued = create_wz_document(db, collaborators.audit.as_ref(), draft).await?;
    let erp = match &collaborators.erp {
        Some(bridge) => push_best_effort(bridge.as_ref(), erp_settings, &issued).await,
        None => ErpPush::Skipped,
    };
    Ok(IssueOutcome { issued, erp })
}

fn rolled_back<E: Into<Error>>(e: E) -> Error {
    Error::DocumentRolledBack {
        source: Box::new(e.into()),
    }
}

async fn write_document<C>(txn: &C, draft: &WzDraft) -> Result<IssuedDocument>
where
    C: ConnectionTrait,
{
    // Numbering must be the first statement of the transaction
    let doc_number = allocate_document_number(txn, draft.doc_type, draft.issue_date).await?;
    let now = chrono::Utc::now().naive_utc();

    let document = wz_document::ActiveModel {
        doc_number: Set(doc_number),
        doc_type: Set(draft.doc_type),
        issue_date: Set(draft.issue_date),
        out_date: Set(draft.out_date),
        status: Set(wz_document::STATUS_ISSUED.to_string()),
        order_id: Set(draft.order_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut lines = Vec::new();
    let mut remainders = Vec::new();
    let mut skipped_line_ids = Vec::new();

    for draft_line in draft.selected_lines() {
        let line_id = draft_line.line.line_id;
        let original = OrderLineItem::find_by_id(line_id)
            .one(txn)
            .await?
            .filter(|line| line.order_id == draft.order_id)
            .ok_or(Error::LineNotFound { line_id })?;
        if original.status != LineStatus::Open {
            return Err(Error::LineNotOpen { line_id });
        }
        if draft_line.line.unit != original.quant_unit
            || draft_line.line.quantity != original.quantity
        {
            return Err(Error::StaleDraftLine { line_id });
        }

        let Some(product) = Product::find_by_id(original.product_id).one(txn).await? else {
            warn!(
                line_id,
                product_id = original.product_id,
                "Product not found, line left off the document"
            );
            skipped_line_ids.push(line_id);
            continue;
        };
        let dims = Dimensions::from(&product);

        // The limit comes from the stored line and product, never from the draft snapshot
        let mut checked = DraftLine::new(&original, Some(&product));
        checked.selected = true;
        checked.wz = draft_line.wz.clone();
        checked.validate()?;

        let snapshot = wz_line_item::ActiveModel {
            wz_document_id: Set(document.id),
            order_line_item_id: Set(original.id),
            product_id: Set(product.id),
            product_name: Set(product.name.clone()),
            quantity: Set(draft_line.wz.quantity),
            unit: Set(draft_line.wz.unit),
            helper_quantity: Set(draft_line.wz.helper_quantity),
            helper_unit: Set(draft_line.wz.helper_unit),
            unit_price: Set(original.unit_price),
            price_unit: Set(original.quant_unit),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        lines.push(snapshot);

        let shipped = convert(
            draft_line.wz.quantity,
            draft_line.wz.unit,
            original.quant_unit,
            &dims,
        );
        // Only an m³ line may round up to whole pieces or packages
        if original.quant_unit != Unit::CubicMeter && shipped > original.quantity {
            return Err(Error::QuantityExceedsRemaining {
                line_id,
                requested: shipped,
                remaining: original.quantity,
                unit: original.quant_unit,
            });
        }
        let remaining = original.quantity - shipped;

        if remaining > Decimal::ZERO {
            let remainder = order_line_item::ActiveModel {
                order_id: Set(original.order_id),
                product_id: Set(original.product_id),
                product_name: Set(original.product_name.clone()),
                quantity: Set(remaining),
                quant_unit: Set(original.quant_unit),
                helper_quantity: Set(helper_for(remaining, &original, &dims)),
                help_quant_unit: Set(original.help_quant_unit),
                unit_price: Set(original.unit_price),
                status: Set(LineStatus::Open),
                inclusion: Set(InclusionState::Remainder),
                origin_line_id: Set(Some(original.chain_root())),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            remainders.push(remainder);
        }

        // The consumed line keeps only what was shipped so a chain always sums to the order
        let kept = shipped.min(original.quantity);
        let kept_helper = helper_for(kept, &original, &dims);
        let mut consumed: order_line_item::ActiveModel = original.into();
        consumed.quantity = Set(kept);
        if kept_helper.is_some() {
            consumed.helper_quantity = Set(kept_helper);
        }
        consumed.status = Set(LineStatus::Consumed);
        consumed.inclusion = Set(InclusionState::Selected);
        consumed.update(txn).await?;
    }

    if lines.is_empty() {
        return Err(Error::EmptyDocument);
    }

    Ok(IssuedDocument {
        document,
        lines,
        remainders,
        skipped_line_ids,
    })
}

/// Helper quantity for `quantity` of `line`'s unit, when the pair is convertible.
fn helper_for(
    quantity: Decimal,
    line: &order_line_item::Model,
    dims: &Dimensions,
) -> Option<Decimal> {
    line.help_quant_unit
        .filter(|helper| line.quant_unit.is_convertible_with(*helper))
        .map(|helper| convert(quantity, line.quant_unit, helper, dims))
}
