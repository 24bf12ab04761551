//! Storage backends for the visitor document.
//!
//! Both backends implement [`VisitorStore`]. Neither surfaces errors:
//! `load` falls back to the empty document and `save` reports a flag.
//! There is no locking between requests, so concurrent writers race and
//! the last `save` wins.

pub mod github;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{AppConfig, StorageBackendKind};
use crate::error::Result;
use crate::models::VisitorDocument;

pub use github::GitHubContentStore;
pub use local::LocalFileStore;

#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Loads the document, or the empty skeleton when nothing readable exists.
    async fn load(&self) -> VisitorDocument;

    /// Persists the whole document. Returns `false` on any failure.
    async fn save(&self, doc: &VisitorDocument) -> bool;

    fn backend_name(&self) -> &'static str;
}

/// Selects the backend named by the configuration.
pub fn build_store(config: &AppConfig) -> Result<Arc<dyn VisitorStore>> {
    let store: Arc<dyn VisitorStore> = match config.storage_backend {
        StorageBackendKind::LocalFile => {
            info!(path = %config.data_file.display(), "storage backend: local file");
            Arc::new(LocalFileStore::new(&config.data_file))
        }
        StorageBackendKind::GitHub => {
            info!(
                repo = %config.github.repo,
                path = %config.github.path,
                persistence = config.github.has_credentials(),
                "storage backend: github"
            );
            Arc::new(GitHubContentStore::new(config.github.clone())?)
        }
    };
    Ok(store)
}
