//! Document tree types
//!
//! Provides [`Document`] and [`Node`]: an ordered, mutable tree of named
//! elements with uniquely-keyed attributes and mixed element/text/comment
//! children.
//!
//! The tree has value semantics: pipeline passes take and return a whole
//! [`Document`], so each transformation is an explicit function from input
//! tree to output tree. Selection (see [`crate::select`]) produces index
//! paths into the tree, which are resolved back into `&mut Node` via
//! [`Node::node_at_mut`] - selection and mutation stay decoupled.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A complete document: one root element plus source-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    root: Node,
    /// Whether the stored source carried an XML declaration.
    has_declaration: bool,
}

impl Document {
    /// Create a document from a root element
    #[inline]
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            root,
            has_declaration: false,
        }
    }

    /// Create a document that serializes with an XML declaration
    #[inline]
    #[must_use]
    pub fn with_declaration(mut self) -> Self {
        self.has_declaration = true;
        self
    }

    /// Whether the source carried an XML declaration
    #[inline]
    #[must_use]
    pub fn has_declaration(&self) -> bool {
        self.has_declaration
    }

    /// Root element
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable root element
    #[inline]
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Consume the document, yielding the root element
    #[inline]
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }
}

/// One child slot of a [`Node`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeChild {
    /// Nested element
    Element(Node),
    /// Character data
    Text(String),
    /// Comment (`<!--...-->`); an empty comment is the ejection placeholder
    Comment(String),
}

impl NodeChild {
    /// View as an element, if this child is one
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&Node> {
        match self {
            Self::Element(node) => Some(node),
            _ => None,
        }
    }

    /// View as an element, mutably
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Node> {
        match self {
            Self::Element(node) => Some(node),
            _ => None,
        }
    }
}

/// A named element with insertion-ordered, uniquely-keyed attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    attrs: IndexMap<String, String>,
    children: Vec<NodeChild>,
}

impl Node {
    /// Create an empty element
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Builder: set text content
    #[inline]
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(NodeChild::Text(text.into()));
        self
    }

    /// Builder: append a child element
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(NodeChild::Element(child));
        self
    }

    /// Element name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by key
    #[inline]
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether the attribute is present
    #[inline]
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Set an attribute, replacing any existing value
    #[inline]
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its previous value
    #[inline]
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.shift_remove(key)
    }

    /// Iterate attributes in insertion order
    #[inline]
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Child slots in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeChild] {
        &self.children
    }

    /// Mutable child slots
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<NodeChild> {
        &mut self.children
    }

    /// Iterate child elements only
    #[inline]
    pub fn child_elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(NodeChild::as_element)
    }

    /// Append a child slot
    #[inline]
    pub fn push_child(&mut self, child: NodeChild) {
        self.children.push(child);
    }

    /// Concatenated text content of this node and its descendants
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                NodeChild::Text(t) => out.push_str(t),
                NodeChild::Element(node) => node.collect_text(out),
                NodeChild::Comment(_) => {}
            }
        }
    }

    /// Replace all children with a single text slot; empty text clears
    /// the node entirely.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(NodeChild::Text(text));
        }
    }

    /// Remove every child slot
    #[inline]
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Resolve an index path produced by a selector into a node.
    ///
    /// The empty path addresses this node; each index addresses a slot in
    /// `children` that must hold an element.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    /// Resolve an index path into a mutable node
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Visit this node and every descendant element, depth-first
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            if let NodeChild::Element(node) = child {
                node.for_each_mut(f);
            }
        }
    }
}
