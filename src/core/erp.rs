//! External ERP bridge.
//!
//! Issued documents can be mirrored into the external ERP for the document types
//! enabled in configuration. The push happens after the WZ transaction committed: the
//! two systems are eventually consistent and a failed push never undoes a document.

use crate::{
    config::settings::ErpSettings,
    core::fulfillment::IssuedDocument,
    core::numbering::format_document_number,
    errors::Result,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

/// Client for the external ERP.
#[async_trait]
pub trait ErpBridge: Send + Sync {
    /// Pushes one issued document with its customer and items, returning the ERP's id.
    async fn push_document(&self, issued: &IssuedDocument) -> Result<String>;
}

/// Outcome of mirroring a document into the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ErpPush {
    /// ERP integration disabled, or not enabled for this document type
    Skipped,
    /// Document accepted by the ERP
    Pushed {
        /// Identifier assigned by the ERP
        external_id: String,
    },
    /// ERP rejected or could not be reached; shown to the user as a warning
    Failed {
        /// Error description
        message: String,
    },
}

/// Pushes `issued` through `bridge` when `settings` enable its document type.
pub async fn push_best_effort(
    bridge: &dyn ErpBridge,
    settings: &ErpSettings,
    issued: &IssuedDocument,
) -> ErpPush {
    if !settings.enabled || !settings.document_types.contains(&issued.document.doc_type) {
        return ErpPush::Skipped;
    }

    let number = format_document_number(&issued.document);
    match bridge.push_document(issued).await {
        Ok(external_id) => {
            info!(%number, %external_id, "Document pushed to ERP");
            ErpPush::Pushed { external_id }
        }
        Err(e) => {
            warn!(%number, error = %e, "ERP push failed");
            ErpPush::Failed {
                message: e.to_string(),
            }
        }
    }
}
