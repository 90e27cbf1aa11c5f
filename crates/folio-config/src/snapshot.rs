//! Configuration snapshots
//!
//! The configuration tree is loaded once at startup and read by every
//! concurrent pipeline run. [`ConfigHandle`] hands out [`Arc`] snapshots
//! that stay valid for the duration of one run; reloading is an atomic
//! pointer swap, never an in-place mutation visible to in-flight readers.

use arc_swap::ArcSwap;
use folio_document::{Document, Node, Selector, XmlError};
use std::sync::Arc;

/// Errors raised while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration source was not well-formed XML
    #[error("configuration xml: {0}")]
    Xml(#[from] XmlError),
}

/// The application's static configuration tree
///
/// Conceptually immutable while request processing is in flight; obtain
/// one through [`ConfigHandle::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    doc: Document,
}

impl ConfigTree {
    /// Wrap an already-parsed configuration document
    #[inline]
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Parse configuration from XML text
    pub fn from_xml(input: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(folio_document::parse(input)?))
    }

    /// Root element of the configuration
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Node {
        self.doc.root()
    }

    /// Locate the first node matching `selector`, as an index path
    #[inline]
    #[must_use]
    pub fn locate(&self, selector: &Selector) -> Option<Vec<usize>> {
        selector.locate_first(self.root())
    }

    /// Resolve an index path into a node
    #[inline]
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        self.root().node_at(path)
    }
}

/// Process-wide holder for the current configuration snapshot
#[derive(Debug)]
pub struct ConfigHandle {
    inner: ArcSwap<ConfigTree>,
}

impl ConfigHandle {
    /// Create a handle around an initial configuration
    #[inline]
    #[must_use]
    pub fn new(tree: ConfigTree) -> Self {
        Self {
            inner: ArcSwap::from_pointee(tree),
        }
    }

    /// Pin the current snapshot for one pipeline run
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigTree> {
        self.inner.load_full()
    }

    /// Atomically replace the configuration.
    ///
    /// Runs already holding a snapshot keep resolving against the old
    /// tree; new runs see the replacement.
    pub fn replace(&self, tree: ConfigTree) {
        tracing::info!("configuration snapshot replaced");
        self.inner.store(Arc::new(tree));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"<configuration>
        <cms_projects>
            <cms_project id="P1" name="Acme FY23"></cms_project>
        </cms_projects>
    </configuration>"#;

    #[test]
    fn from_xml_parses_tree() {
        let tree = ConfigTree::from_xml(CONFIG).unwrap();
        assert_eq!(tree.root().name(), "configuration");
    }

    #[test]
    fn from_xml_rejects_garbage() {
        assert!(ConfigTree::from_xml("<configuration>").is_err());
    }

    #[test]
    fn locate_finds_project_node() {
        let tree = ConfigTree::from_xml(CONFIG).unwrap();
        let sel: Selector = "/configuration/cms_projects/cms_project[@id='P1']"
            .parse()
            .unwrap();
        let path = tree.locate(&sel).unwrap();
        assert_eq!(tree.node_at(&path).unwrap().attr("name"), Some("Acme FY23"));
    }

    #[test]
    fn handle_snapshot_survives_replace() {
        let handle = ConfigHandle::new(ConfigTree::from_xml(CONFIG).unwrap());
        let pinned = handle.snapshot();

        let replacement =
            ConfigTree::from_xml("<configuration><general></general></configuration>").unwrap();
        handle.replace(replacement.clone());

        // The pinned snapshot still sees the old tree.
        assert!(pinned.root().node_at(&[0]).unwrap().name() == "cms_projects");
        // New snapshots see the replacement.
        assert_eq!(handle.snapshot().as_ref(), &replacement);
    }
}
