//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod audit_log;
pub mod doc_counter;
pub mod enums;
pub mod order;
pub mod order_line_item;
pub mod product;
pub mod wz_document;
pub mod wz_line_item;

pub use enums::{DocumentType, InclusionState, LineStatus, Unit};

// Re-export specific types to avoid conflicts
pub use audit_log::{Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel};
pub use doc_counter::{Column as DocCounterColumn, Entity as DocCounter, Model as DocCounterModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_line_item::{
    Column as OrderLineItemColumn, Entity as OrderLineItem, Model as OrderLineItemModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use wz_document::{Column as WzDocumentColumn, Entity as WzDocument, Model as WzDocumentModel};
pub use wz_line_item::{Column as WzLineItemColumn, Entity as WzLineItem, Model as WzLineItemModel};
