//! Document service
//!
//! The facade the hosting application talks to. Loading composes the
//! stored fragment into an editor-ready document: read, parse, pin a
//! configuration snapshot, run the resolution pipeline. Saving inverts
//! it: eject derived markup, serialize, write, commit. Stored fragments
//! therefore never contain resolved values.

use folio_config::{ConfigHandle, ConfigTree};
use folio_document::Document;
use folio_pipeline::{FailureMode, Pass, Pipeline, ResolveContext};
use folio_resolve::{ConfigLinkResolver, Ejector};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::store::ContentStore;

/// Load/save orchestration over one content store
pub struct DocumentService<S: ContentStore> {
    store: S,
    config: Arc<ConfigHandle>,
    pipeline: Pipeline,
    ejector: Ejector,
    data_dir: PathBuf,
}

impl<S: ContentStore> std::fmt::Debug for DocumentService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("passes", &self.pipeline.pass_names())
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl<S: ContentStore> DocumentService<S> {
    /// Create a service with the stock resolver as the first pass
    #[must_use]
    pub fn new(store: S, config: Arc<ConfigHandle>) -> Self {
        Self::with_resolver(store, config, ConfigLinkResolver::with_defaults())
    }

    /// Create a service around a custom-configured resolver
    #[must_use]
    pub fn with_resolver(store: S, config: Arc<ConfigHandle>, resolver: ConfigLinkResolver) -> Self {
        Self {
            store,
            config,
            pipeline: Pipeline::new().with_pass(resolver),
            ejector: Ejector::new(),
            data_dir: PathBuf::new(),
        }
    }

    /// Builder: append a pass after the ones already registered
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.pipeline.push(Box::new(pass));
        self
    }

    /// Builder: set how a pass failure terminates a load
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.pipeline = std::mem::take(&mut self.pipeline).with_mode(mode);
        self
    }

    /// Builder: set the folder location passed to passes via the context
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Names of the registered passes, in execution order
    #[must_use]
    pub fn pass_names(&self) -> Vec<&str> {
        self.pipeline.pass_names()
    }

    /// Atomically replace the configuration for subsequent loads.
    ///
    /// Loads already in flight keep their pinned snapshot.
    pub fn reload_config(&self, tree: ConfigTree) {
        self.config.replace(tree);
    }

    /// Load a fragment and compose it into an editor-ready document.
    ///
    /// # Errors
    /// Fails when the fragment cannot be read, is not well-formed XML, or
    /// a pass fails fatally. Per-node resolution problems never fail a
    /// load; they surface as status annotations in the document.
    pub async fn load(
        &self,
        project_id: &str,
        language: &str,
        fragment: &str,
    ) -> Result<Document, ServiceError> {
        let raw = self.store.load_fragment(fragment).await?;
        let doc = folio_document::parse(&raw)?;

        let ctx = ResolveContext::new(project_id, language, self.config.snapshot())
            .with_data_dir(self.data_dir.clone());
        tracing::info!(
            request = %ctx.request_id,
            project = project_id,
            fragment,
            "loading document"
        );

        Ok(self.pipeline.run(doc, &ctx)?)
    }

    /// Eject derived markup and persist the fragment.
    ///
    /// # Errors
    /// Fails when the store rejects the write or the commit.
    pub async fn save(&self, fragment: &str, mut doc: Document) -> Result<(), ServiceError> {
        self.ejector.eject(&mut doc);
        let xml = folio_document::serialize(&doc);

        self.store.save_fragment(fragment, &xml).await?;
        self.store.commit(fragment).await?;
        tracing::info!(fragment, bytes = xml.len(), "document saved");
        Ok(())
    }
}
