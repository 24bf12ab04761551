use std::sync::Arc;

use crate::models::{RECENT_VISITS_LIMIT, StatsResponse, VisitorDocument, today};
use crate::storage::VisitorStore;

#[derive(Clone)]
pub struct StatsReporter {
    store: Arc<dyn VisitorStore>,
}

impl StatsReporter {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Read-only: loads the document and derives the stats, never saves.
    pub async fn stats(&self) -> StatsResponse {
        let doc = self.store.load().await;
        VisitorStats::from_document(&doc, &today())
    }
}

pub struct VisitorStats;

impl VisitorStats {
    /// `today` is matched as a literal prefix of each stored timestamp.
    pub fn from_document(doc: &VisitorDocument, today: &str) -> StatsResponse {
        StatsResponse {
            total_visits: doc.total_visits,
            unique_visitors: doc.unique_visitor_count(),
            visits_today: doc.visits_on(today),
            recent_visits: doc.recent_visits(RECENT_VISITS_LIMIT).to_vec(),
        }
    }
}
