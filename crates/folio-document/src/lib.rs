//! Folio Document Model
//!
//! The document tree the resolution pipeline operates on:
//!
//! - [`Document`] / [`Node`]: an ordered, mutable element tree with
//!   uniquely-keyed attributes and mixed element/text/comment children
//! - [`Selector`]: a small path grammar for scoping passes and evaluating
//!   configuration lookups
//! - [`xml`]: parse stored fragments and serialize them back, never
//!   emitting self-closing elements
//!
//! Each pipeline invocation owns its `Document` exclusively; there is no
//! shared mutable tree state across concurrent resolutions.

#![warn(unreachable_pub)]

pub mod node;
pub mod select;
pub mod xml;

pub use node::{Document, Node, NodeChild};
pub use select::{Selector, SelectorError};
pub use xml::{parse, serialize, XmlError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
