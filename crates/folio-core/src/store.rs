//! Fragment storage
//!
//! Documents live as XML fragment files under a per-project data
//! directory. [`ContentStore`] abstracts the backing medium so the
//! service can be tested against a temporary directory; [`FsStore`] is
//! the production implementation over the local filesystem.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Errors raised by a content store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Fragment file does not exist
    #[error("fragment not found: {0}")]
    NotFound(String),

    /// Underlying I/O failure
    #[error("fragment io: {0}")]
    Io(#[from] std::io::Error),

    /// Fragment name would escape the store root
    #[error("invalid fragment name: {0}")]
    InvalidName(String),
}

/// Storage backend for document fragments, keyed by fragment name
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the raw XML text of a fragment
    async fn load_fragment(&self, name: &str) -> Result<String, StoreError>;

    /// Write the raw XML text of a fragment, replacing any previous content
    async fn save_fragment(&self, name: &str, content: &str) -> Result<(), StoreError>;

    /// Commit a completed save.
    ///
    /// Called once per save after the fragment is written; backends with
    /// version control hook their commit step in here.
    async fn commit(&self, name: &str) -> Result<(), StoreError>;
}

/// Filesystem store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store over `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fragment_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty()
            || name.contains("..")
            || name.starts_with('/')
            || name.contains('\\')
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ContentStore for FsStore {
    async fn load_fragment(&self, name: &str) -> Result<String, StoreError> {
        let path = self.fragment_path(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save_fragment(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.fragment_path(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        Ok(())
    }

    async fn commit(&self, name: &str) -> Result<(), StoreError> {
        // The filesystem backend has no versioning layer; the write above
        // already is the durable state.
        tracing::debug!(fragment = name, "fragment committed");
        Ok(())
    }
}
