//! Document counter entity - One row per numbering bucket.
//!
//! Writing the row inside the issuing transaction takes a write lock on the bucket, so
//! two documents of the same type and month can never read the same count.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Counter database model keyed by `(doc_type, year, month)`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wz_counters")]
pub struct Model {
    /// Document type code (e.g., `"WZ"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub doc_type: String,
    /// Calendar year of the issue date
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    /// Calendar month (1-12) of the issue date
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
    /// Last number handed out in this bucket
    pub last_number: i32,
}

/// Counters have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
