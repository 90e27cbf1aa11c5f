//! Pipeline orchestrator
//!
//! Runs an ordered list of passes over a document. Passes execute
//! strictly in sequence - the output of pass *i* is the input of pass
//! *i+1* - and the first failure skips everything that remains. The
//! caller picks one of two termination modes: fatal (failure propagates)
//! or lenient (a synthetic error document is returned so bulk callers can
//! keep going). Failures are never retried; passes are assumed to fail
//! deterministically for the same document and configuration.

use crate::error::{PassError, PipelineError};
use crate::pass::{Pass, ResolveContext};
use folio_document::{Document, Node};

/// How a pipeline run reacts to the first pass failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Propagate the failure to the caller as a terminal error
    #[default]
    Fatal,
    /// Swallow the failure and return a synthetic error document
    Lenient,
}

/// An ordered list of passes over one document
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
    mode: FailureMode,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.pass_names())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create an empty pipeline in fatal mode
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            mode: FailureMode::Fatal,
        }
    }

    /// Set the termination mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: append a pass
    #[inline]
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Append an already-boxed pass
    #[inline]
    pub fn push(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Names of the registered passes, in execution order
    #[must_use]
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Number of registered passes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the pipeline has no passes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order.
    ///
    /// # Errors
    /// In [`FailureMode::Fatal`], the first pass failure is returned as a
    /// [`PipelineError`]. In [`FailureMode::Lenient`] the failure is
    /// logged and a synthetic error document is returned instead.
    pub fn run(&self, doc: Document, ctx: &ResolveContext) -> Result<Document, PipelineError> {
        let mut current = doc;
        for pass in &self.passes {
            tracing::debug!(
                request = %ctx.request_id,
                pass = pass.name(),
                "running resolution pass"
            );
            match pass.apply(current, ctx) {
                Ok(next) => current = next,
                Err(error) => {
                    tracing::error!(
                        request = %ctx.request_id,
                        pass = pass.name(),
                        message = %error.message,
                        debug = %error.debug,
                        "resolution pass failed; skipping remaining passes"
                    );
                    return match self.mode {
                        FailureMode::Fatal => Err(PipelineError::from_pass(pass.name(), error)),
                        FailureMode::Lenient => Ok(error_document(pass.name(), &error)),
                    };
                }
            }
        }
        Ok(current)
    }
}

/// Synthetic document standing in for a failed resolution in lenient mode.
///
/// Carries the failing pass and the human-readable message; the debug
/// string stays in the logs.
#[must_use]
pub fn error_document(pass: &str, error: &PassError) -> Document {
    Document::new(
        Node::new("error")
            .with_attr("pass", pass)
            .with_text(error.message.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::ConfigTree;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ctx() -> ResolveContext {
        let config = ConfigTree::from_xml("<configuration></configuration>").unwrap();
        ResolveContext::new("P1", "en", Arc::new(config))
    }

    /// Appends one child element recording its position in the sequence.
    struct StampPass {
        label: &'static str,
        counter: Arc<AtomicUsize>,
    }

    impl Pass for StampPass {
        fn name(&self) -> &str {
            self.label
        }

        fn apply(&self, mut doc: Document, _ctx: &ResolveContext) -> Result<Document, PassError> {
            let order = self.counter.fetch_add(1, Ordering::SeqCst);
            doc.root_mut().push_child(folio_document::NodeChild::Element(
                Node::new("stamp")
                    .with_attr("pass", self.label)
                    .with_attr("order", order.to_string()),
            ));
            Ok(doc)
        }
    }

    struct FailPass;

    impl Pass for FailPass {
        fn name(&self) -> &str {
            "broken"
        }

        fn apply(&self, _doc: Document, _ctx: &ResolveContext) -> Result<Document, PassError> {
            Err(PassError::new("synthetic failure", "debug details"))
        }
    }

    #[test]
    fn run_threads_document_through_passes_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_pass(StampPass {
                label: "first",
                counter: Arc::clone(&counter),
            })
            .with_pass(StampPass {
                label: "second",
                counter: Arc::clone(&counter),
            });

        let out = pipeline.run(Document::new(Node::new("doc")), &ctx()).unwrap();
        let stamps: Vec<_> = out
            .root()
            .child_elements()
            .map(|n| (n.attr("pass").unwrap().to_string(), n.attr("order").unwrap().to_string()))
            .collect();
        assert_eq!(
            stamps,
            vec![
                ("first".to_string(), "0".to_string()),
                ("second".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn run_fatal_mode_propagates_failure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new().with_pass(FailPass).with_pass(StampPass {
            label: "after",
            counter: Arc::clone(&counter),
        });

        let err = pipeline
            .run(Document::new(Node::new("doc")), &ctx())
            .unwrap_err();
        assert_eq!(err.pass, "broken");
        assert_eq!(err.message, "synthetic failure");
        assert_eq!(err.debug, "debug details");
        // The pass after the failure never ran.
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn run_lenient_mode_returns_error_document() {
        let pipeline = Pipeline::new()
            .with_mode(FailureMode::Lenient)
            .with_pass(FailPass);

        let out = pipeline.run(Document::new(Node::new("doc")), &ctx()).unwrap();
        assert_eq!(out.root().name(), "error");
        assert_eq!(out.root().attr("pass"), Some("broken"));
        assert_eq!(out.root().text(), "synthetic failure");
        // Debug context never lands in the document itself.
        assert!(!folio_document::serialize(&out).contains("debug details"));
    }

    #[test]
    fn run_empty_pipeline_is_identity() {
        let doc = Document::new(Node::new("doc").with_text("unchanged"));
        let out = Pipeline::new().run(doc.clone(), &ctx()).unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn pass_names_follow_registration_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_pass(StampPass {
                label: "a",
                counter: Arc::clone(&counter),
            })
            .with_pass(FailPass);
        assert_eq!(pipeline.pass_names(), vec!["a", "broken"]);
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
    }
}
