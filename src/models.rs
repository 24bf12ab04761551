//! Persisted visitor document and HTTP response bodies.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// User agent recorded when the request carries none.
pub const UNKNOWN_AGENT: &str = "Unknown";

/// Number of trailing visits reported by the stats endpoint.
pub const RECENT_VISITS_LIMIT: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub timestamp: String,
    #[serde(rename = "ip")]
    pub address: String,
    #[serde(rename = "user_agent")]
    pub agent: String,
}

impl VisitRecord {
    pub fn new(
        timestamp: impl Into<String>,
        address: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            address: address.into(),
            agent: agent.into(),
        }
    }

    /// Record stamped with the local clock. A missing agent becomes `"Unknown"`.
    pub fn now(address: &str, agent: Option<&str>) -> Self {
        Self::new(
            format_timestamp(&Local::now()),
            address,
            agent.unwrap_or(UNKNOWN_AGENT),
        )
    }
}

/// The single JSON document holding all visitor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorDocument {
    pub total_visits: u64,
    pub unique_visitors: Vec<String>,
    pub visits: Vec<VisitRecord>,
}

impl VisitorDocument {
    /// The empty skeleton.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends the record, bumps the counter and registers the address once.
    pub fn record_visit(&mut self, record: VisitRecord) {
        if !self.unique_visitors.contains(&record.address) {
            self.unique_visitors.push(record.address.clone());
        }
        self.visits.push(record);
        self.total_visits += 1;
    }

    pub fn unique_visitor_count(&self) -> usize {
        self.unique_visitors.len()
    }

    /// Counts visits whose timestamp string starts with `date_prefix`.
    pub fn visits_on(&self, date_prefix: &str) -> usize {
        self.visits
            .iter()
            .filter(|visit| visit.timestamp.starts_with(date_prefix))
            .count()
    }

    /// The last `limit` visits in recording order.
    pub fn recent_visits(&self, limit: usize) -> &[VisitRecord] {
        let start = self.visits.len().saturating_sub(limit);
        &self.visits[start..]
    }
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
    pub total_visits: u64,
    pub unique_visitors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_visits: u64,
    pub unique_visitors: usize,
    pub visits_today: usize,
    pub recent_visits: Vec<VisitRecord>,
}
