//! Folio Configuration
//!
//! The read-mostly configuration the pipeline resolves references against:
//!
//! - [`ConfigTree`]: the parsed configuration document
//! - [`ConfigHandle`]: atomic snapshot holder; reload is a pointer swap
//! - [`KeywordRegistry`]: configuration keyword to lookup-selector routing,
//!   validated at registration time

#![warn(unreachable_pub)]

pub mod keywords;
pub mod snapshot;

pub use keywords::{KeywordRegistry, RouteError, RouteTemplate};
pub use snapshot::{ConfigError, ConfigHandle, ConfigTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
