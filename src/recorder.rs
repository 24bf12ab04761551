use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{TrackResponse, VisitRecord};
use crate::storage::VisitorStore;

/// Records visits with a load-append-save cycle against the store.
#[derive(Clone)]
pub struct VisitRecorder {
    store: Arc<dyn VisitorStore>,
}

impl VisitRecorder {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Counting is best-effort: a failed save is logged and the response
    /// still reflects the in-memory counters.
    pub async fn record(&self, address: &str, agent: Option<&str>) -> TrackResponse {
        let mut doc = self.store.load().await;
        doc.record_visit(VisitRecord::now(address, agent));

        if self.store.save(&doc).await {
            debug!(address, total_visits = doc.total_visits, "visit recorded");
        } else {
            warn!(
                address,
                backend = self.store.backend_name(),
                "visit counted but not persisted"
            );
        }

        TrackResponse {
            success: true,
            total_visits: doc.total_visits,
            unique_visitors: doc.unique_visitor_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitorDocument;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Store whose saves always fail, to check the response ignores them.
    struct ReadOnlyStore {
        doc: Mutex<VisitorDocument>,
    }

    #[async_trait]
    impl VisitorStore for ReadOnlyStore {
        async fn load(&self) -> VisitorDocument {
            self.doc.lock().unwrap().clone()
        }

        async fn save(&self, _doc: &VisitorDocument) -> bool {
            false
        }

        fn backend_name(&self) -> &'static str {
            "read-only"
        }
    }

    #[tokio::test]
    async fn failed_save_still_reports_success() {
        let mut seeded = VisitorDocument::empty();
        seeded.record_visit(VisitRecord::new("2026-10-15T08:00:00.000000", "9.9.9.9", "x"));
        let recorder = VisitRecorder::new(Arc::new(ReadOnlyStore {
            doc: Mutex::new(seeded),
        }));

        let first = recorder.record("1.2.3.4", None).await;
        assert!(first.success);
        assert_eq!(first.total_visits, 2);
        assert_eq!(first.unique_visitors, 2);

        // Nothing was persisted, so the next visit starts from the same state.
        let second = recorder.record("5.6.7.8", Some("curl/8.0")).await;
        assert_eq!(second.total_visits, 2);
    }
}
