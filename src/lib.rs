//! Visitor-tracking HTTP API.
//!
//! Records page visits (timestamp, address, user agent) into a single JSON
//! document and serves aggregate statistics over it. The document lives
//! either in a local file or in a GitHub repository via the contents API.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod recorder;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::build_router;
pub use config::{AppConfig, GitHubConfig, StorageBackendKind};
pub use error::StorageError;
pub use models::{StatsResponse, TrackResponse, VisitRecord, VisitorDocument};
pub use recorder::VisitRecorder;
pub use state::AppState;
pub use stats::{StatsReporter, VisitorStats};
pub use storage::{GitHubContentStore, LocalFileStore, VisitorStore, build_store};
