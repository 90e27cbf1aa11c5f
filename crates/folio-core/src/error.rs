//! Service-level error taxonomy
//!
//! Wraps the storage, parsing, and pipeline failure types into the one
//! error surface the hosting application sees.

use folio_document::XmlError;
use folio_pipeline::PipelineError;

use crate::store::StoreError;

/// Errors raised by [`crate::DocumentService`]
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Fragment could not be read from or written to the store
    #[error("store: {0}")]
    Store(#[from] StoreError),

    /// Stored fragment was not well-formed XML
    #[error("document xml: {0}")]
    Xml(#[from] XmlError),

    /// A pipeline pass failed fatally
    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),
}
