//! Event data model.
//!
//! The gate reads two structural signals from an event: its status (zero
//! means healthy) and whether a metrics payload is attached. Everything else
//! the event carries is opaque here and only reachable by name from filter
//! statements.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single observability occurrence, supplied by the caller and read-only
/// for the duration of a filtering decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Check status; zero is healthy, anything else is an incident.
    #[serde(default)]
    pub status: i64,

    /// Metric data attached to the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,

    /// Remaining event fields, exposed to filter statements by name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Event {
    /// Whether this event indicates an incident.
    pub fn is_incident(&self) -> bool {
        self.status != 0
    }

    /// Whether this event has metric data.
    pub fn has_metrics(&self) -> bool {
        self.metrics.is_some()
    }
}
