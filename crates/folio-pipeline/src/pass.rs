//! The pass contract
//!
//! Every resolution stage - configuration links, table sync, footnotes,
//! image injection, project hooks - implements [`Pass`]: a function from
//! document to document that may raise a structured failure. Passes take
//! the tree by value and return a new one, so each stage is testable in
//! isolation.

use crate::error::PassError;
use folio_config::ConfigTree;
use folio_document::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Per-request context threaded through every pass.
///
/// Carries the request and project identifiers, the language filter, the
/// folder location of the document's data, and the configuration snapshot
/// pinned for this run. Constructed fresh per request; the snapshot is
/// explicitly injected rather than read from process globals.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Unique id of the inbound request
    pub request_id: Uuid,
    /// Project the document belongs to
    pub project_id: String,
    /// Language filter for content scoping (e.g. `en`)
    pub language: String,
    /// Folder location of the document's data
    pub data_dir: PathBuf,
    /// Configuration snapshot pinned for this run
    pub config: Arc<ConfigTree>,
}

impl ResolveContext {
    /// Create a context for one pipeline run
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        language: impl Into<String>,
        config: Arc<ConfigTree>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            project_id: project_id.into(),
            language: language.into(),
            data_dir: PathBuf::new(),
            config,
        }
    }

    /// Set the folder location of the document's data
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Folder location of the document's data
    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// One stage of the resolution pipeline
pub trait Pass: Send + Sync {
    /// Stable name, used in logs and failure attribution
    fn name(&self) -> &str;

    /// Transform the document.
    ///
    /// # Errors
    /// Returns [`PassError`] only for genuinely fatal, run-aborting
    /// conditions; per-node problems must degrade to status annotations
    /// inside the returned document.
    fn apply(&self, doc: Document, ctx: &ResolveContext) -> Result<Document, PassError>;
}
