//! Document numbering.
//!
//! Numbers restart every month for each document type: the n-th WZ issued in October
//! 2026 is `WZ n/10/2026`. The allocation must run inside the issuing transaction, as its
//! first statement, so the counter row write serializes concurrent issuers of the same
//! bucket before either of them counts existing documents.

use crate::{
    entities::{DocCounter, DocumentType, WzDocument, doc_counter, wz_document},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate};
use sea_orm::{PaginatorTrait, prelude::*, sea_query::OnConflict};
use sea_orm::{Set, sea_query::Expr};
use tracing::debug;

/// First and last day of the month containing `date`.
///
/// # Errors
/// Returns [`Error::InvalidDate`] at the edge of the supported calendar range.
pub fn month_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let start = date.with_day(1).ok_or_else(|| Error::InvalidDate {
        message: format!("no first day for {date}"),
    })?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| Error::InvalidDate {
            message: format!("no month end for {date}"),
        })?;
    Ok((start, end))
}

/// Hands out the next number in the `(doc_type, month, year)` bucket of `issue_date`.
///
/// The number is the count of documents already in the bucket plus one. Call this on an
/// open transaction before any other statement and insert the document in the same
/// transaction.
///
/// # Errors
/// Returns a database error, or [`Error::InvalidDate`] for out-of-range dates.
pub async fn allocate_document_number<C>(
    db: &C,
    doc_type: DocumentType,
    issue_date: NaiveDate,
) -> Result<i32>
where
    C: ConnectionTrait,
{
    let year = issue_date.year();
    let month = i32::try_from(issue_date.month())?;
    let bucket = || {
        doc_counter::Column::DocType
            .eq(doc_type.code())
            .and(doc_counter::Column::Year.eq(year))
            .and(doc_counter::Column::Month.eq(month))
    };

    // Take the bucket's write lock first
    let seed = doc_counter::ActiveModel {
        doc_type: Set(doc_type.code().to_string()),
        year: Set(year),
        month: Set(month),
        last_number: Set(0),
    };
    DocCounter::insert(seed)
        .on_conflict(
            OnConflict::columns([
                doc_counter::Column::DocType,
                doc_counter::Column::Year,
                doc_counter::Column::Month,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    DocCounter::update_many()
        .col_expr(
            doc_counter::Column::LastNumber,
            Expr::col(doc_counter::Column::LastNumber).add(1),
        )
        .filter(bucket())
        .exec(db)
        .await?;

    let (start, end) = month_bounds(issue_date)?;
    let existing = WzDocument::find()
        .filter(wz_document::Column::DocType.eq(doc_type))
        .filter(wz_document::Column::IssueDate.between(start, end))
        .count(db)
        .await?;
    let number = i32::try_from(existing + 1)?;

    DocCounter::update_many()
        .col_expr(doc_counter::Column::LastNumber, Expr::value(number))
        .filter(bucket())
        .exec(db)
        .await?;

    debug!(%doc_type, year, month, number, "Allocated document number");
    Ok(number)
}

/// Renders the printed document number, e.g. `WZ 7/10/2026`.
#[must_use]
pub fn format_document_number(document: &wz_document::Model) -> String {
    format!(
        "{} {}/{:02}/{}",
        document.doc_type,
        document.doc_number,
        document.issue_date.month(),
        document.issue_date.year()
    )
}
