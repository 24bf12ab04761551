use std::sync::Arc;

use crate::recorder::VisitRecorder;
use crate::stats::StatsReporter;
use crate::storage::VisitorStore;

#[derive(Clone)]
pub struct AppState {
    pub recorder: VisitRecorder,
    pub reporter: StatsReporter,
    pub backend: &'static str,
}

impl AppState {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self {
            backend: store.backend_name(),
            recorder: VisitRecorder::new(store.clone()),
            reporter: StatsReporter::new(store),
        }
    }
}
