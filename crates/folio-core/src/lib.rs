//! Folio Core - document service facade
//!
//! Ties the lower layers together for the hosting application:
//!
//! - [`DocumentService`]: load = read + parse + resolve, save = eject +
//!   serialize + write + commit
//! - [`ContentStore`] / [`FsStore`]: fragment storage abstraction
//! - [`telemetry`]: one-shot tracing setup for the hosting process
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_config::{ConfigHandle, ConfigTree};
//! use folio_core::{DocumentService, FsStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigTree::from_xml(&std::fs::read_to_string("config.xml")?)?;
//! let service = DocumentService::new(
//!     FsStore::new("/data/fragments"),
//!     Arc::new(ConfigHandle::new(config)),
//! );
//!
//! let doc = service.load("P1", "en", "chapter-1.xml").await?;
//! service.save("chapter-1.xml", doc).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;

pub use error::ServiceError;
pub use service::DocumentService;
pub use store::{ContentStore, FsStore, StoreError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
