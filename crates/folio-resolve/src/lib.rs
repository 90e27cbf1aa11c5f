//! Folio Resolution
//!
//! The configuration-link machinery of the pipeline:
//!
//! - [`Reference`] / [`Operation`]: the `keyword#path[#operation]` grammar
//! - [`ResolutionStatus`]: per-node outcome vocabulary and the derived
//!   annotation attributes
//! - [`FormatterRegistry`]: pluggable value formatters, with built-in
//!   date formatting
//! - [`ConfigLinkResolver`]: the injection pass that resolves references
//!   against a configuration snapshot
//! - [`Ejector`]: the inverse pass that strips derived markup before save
//!
//! Injection and ejection are symmetric: resolving, ejecting, and
//! resolving again yields the same document.

#![warn(unreachable_pub)]

pub mod eject;
pub mod formatter;
pub mod reference;
pub mod resolver;
pub mod status;

pub use eject::Ejector;
pub use formatter::{FormatOutcome, FormatterRegistry};
pub use reference::{Operation, Reference};
pub use resolver::{ConfigLinkResolver, NodeResolution};
pub use status::{ResolutionStatus, EDITABLE_ATTR, REFERENCE_ATTR, STATUS_ATTR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
