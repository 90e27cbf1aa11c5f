//! Ejection of derived markup
//!
//! The inverse of resolution, run before a document is persisted: every
//! node carrying derived annotations loses its resolved content and the
//! status/editability attributes, keeping only the authored reference
//! attribute. Stored documents therefore never contain resolved values,
//! and injection after load always recomputes them from the current
//! configuration.

use crate::status::{EDITABLE_ATTR, REFERENCE_ATTR, STATUS_ATTR};
use folio_document::{Document, Node, NodeChild};
use folio_pipeline::{Pass, PassError, ResolveContext};

/// Strips resolution output from a document before it is stored
#[derive(Debug, Clone, Copy, Default)]
pub struct Ejector;

impl Ejector {
    /// Create an ejector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Remove derived annotations and content from every resolved node.
    ///
    /// Any node carrying the status or editability attribute counts as
    /// resolved, whatever the status value says; the reference attribute
    /// is left untouched. The emptied node keeps a single empty comment
    /// child so serialization cannot collapse it into a self-closing
    /// element.
    pub fn eject(&self, doc: &mut Document) {
        let mut stripped = 0usize;
        doc.root_mut().for_each_mut(&mut |node: &mut Node| {
            if node.has_attr(STATUS_ATTR) || node.has_attr(EDITABLE_ATTR) {
                node.remove_attr(STATUS_ATTR);
                node.remove_attr(EDITABLE_ATTR);
                node.clear_children();
                node.push_child(NodeChild::Comment(String::new()));
                stripped += 1;
            }
        });
        tracing::debug!(nodes = stripped, "ejected derived markup");
    }
}

impl Pass for Ejector {
    fn name(&self) -> &str {
        "eject"
    }

    fn apply(&self, mut doc: Document, _ctx: &ResolveContext) -> Result<Document, PassError> {
        self.eject(&mut doc);
        Ok(doc)
    }
}
