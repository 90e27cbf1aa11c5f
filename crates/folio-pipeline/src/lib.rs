//! Folio Pipeline
//!
//! The orchestration contract for document resolution:
//!
//! - [`Pass`]: one stage of the pipeline, a document-to-document function
//!   with structured failure
//! - [`ResolveContext`]: per-request identifiers, language filter, data
//!   folder, and the injected configuration snapshot
//! - [`Pipeline`]: strict sequencing with short-circuit failure handling
//!   and fatal/lenient termination modes
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_pipeline::{FailureMode, Pipeline, ResolveContext};
//!
//! let pipeline = Pipeline::new()
//!     .with_mode(FailureMode::Fatal)
//!     .with_pass(config_link_resolver);
//! let resolved = pipeline.run(document, &ctx)?;
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod pass;
pub mod pipeline;

pub use error::{PassError, PipelineError};
pub use pass::{Pass, ResolveContext};
pub use pipeline::{error_document, FailureMode, Pipeline};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
