//! Response interpretation.
//!
//! The boundary reply guarantees nothing: text may be absent or blank, and
//! citation candidates may lack a web reference entirely. This module turns
//! that raw shape into a validated outcome or a typed failure.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::provider::RawAnalysis;

/// One citation attesting to an external reference used by the analysis.
///
/// `uri` is required; a missing title is preserved as `None` so presentation
/// layers can render their own fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub uri: String,
}

/// Validated result of a completed analysis job.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: String,
    pub sources: Vec<GroundingSource>,
}

/// Validate a raw boundary reply.
///
/// The report text is required and must contain something other than
/// whitespace; it is returned verbatim, untrimmed. Citation candidates are
/// kept only when they carry a web reference with a non-empty URI.
pub fn interpret(raw: RawAnalysis) -> Result<AuditOutcome> {
    let report = match raw.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(AuditError::EmptyReport),
    };

    let sources = raw
        .grounding
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            let uri = web.uri.filter(|uri| !uri.is_empty())?;
            Some(GroundingSource {
                title: web.title,
                uri,
            })
        })
        .collect();

    Ok(AuditOutcome { report, sources })
}
