use serde::{Deserialize, Serialize};

use super::interpreter::GroundingSource;

/// Lifecycle events emitted around an analysis job.
///
/// Sent over an optional unbounded channel so headless consumers can follow
/// a job without polling the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A job was accepted and the boundary call is underway.
    Started { job_id: String, asset_count: usize },

    /// The job resolved with a usable report.
    Completed {
        report: String,
        sources: Vec<GroundingSource>,
        duration_ms: u64,
    },

    /// The job resolved in an error state.
    Failed { message: String },
}
