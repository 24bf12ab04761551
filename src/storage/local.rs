use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::{debug, warn};

use super::VisitorStore;
use crate::error::Result;
use crate::models::VisitorDocument;

/// Stores the document as pretty-printed JSON in a single local file.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<VisitorDocument>> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    async fn write(&self, doc: &VisitorDocument) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(doc)?;
        let path = self.path.clone();
        task::spawn_blocking(move || replace_file(&path, &serialized)).await??;
        Ok(())
    }
}

// Each save writes its own temp file next to the target and renames it into
// place, so readers see either the old or the new document.
fn replace_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.flush()?;
    temp.persist(path)?;
    Ok(())
}

#[async_trait]
impl VisitorStore for LocalFileStore {
    async fn load(&self) -> VisitorDocument {
        match self.read().await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(path = %self.path.display(), "no visitor data yet, starting empty");
                VisitorDocument::empty()
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "unreadable visitor data, starting empty"
                );
                VisitorDocument::empty()
            }
        }
    }

    async fn save(&self, doc: &VisitorDocument) -> bool {
        match self.write(doc).await {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to save visitor data");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitRecord;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_pretty_json_with_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path().join("visitor_data.json"));

        let mut doc = VisitorDocument::empty();
        doc.record_visit(VisitRecord::new("2026-10-16T10:00:00.000000", "1.2.3.4", "curl"));
        assert!(store.save(&doc).await);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("{\n  \"total_visits\": 1,"));
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temp file left behind");
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path().join("nested/data/visits.json"));

        assert!(store.save(&VisitorDocument::empty()).await);
        assert_eq!(store.load().await, VisitorDocument::empty());
    }
}
