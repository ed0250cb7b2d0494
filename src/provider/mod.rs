//! Analysis provider boundary.
//!
//! The provider is an opaque external collaborator reached over a
//! request/response interface. This module defines the trait the session
//! orchestrates against and the raw reply shape the interpreter consumes;
//! concrete transports live in their own modules.

use async_trait::async_trait;

use crate::error::Result;

pub mod gemini;

pub use gemini::GeminiProvider;

/// Sampling temperature used for every audit request.
pub const AUDIT_TEMPERATURE: f64 = 0.1;

/// One outbound analysis request.
///
/// `contents` is the fully assembled file payload; the provider supplies its
/// own system directive and grounding configuration.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub contents: String,
    pub temperature: f64,
}

impl AnalysisRequest {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            temperature: AUDIT_TEMPERATURE,
        }
    }
}

/// Raw, unvalidated reply from the provider.
///
/// Fields mirror what the wire actually guarantees, which is very little:
/// the report text may be missing and each grounding candidate may or may
/// not carry a web reference. Validation is the interpreter's job.
#[derive(Debug, Clone, Default)]
pub struct RawAnalysis {
    pub text: Option<String>,
    pub grounding: Vec<GroundingChunk>,
}

/// One citation candidate as returned by the provider.
#[derive(Debug, Clone, Default)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

/// A web reference inside a grounding candidate.
#[derive(Debug, Clone, Default)]
pub struct WebSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// Trait for analysis providers.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Run one analysis over the assembled payload.
    ///
    /// Transport-level failures (network, non-success status, undecodable
    /// body) surface as [`crate::error::AuditError::Boundary`]; a reply that
    /// decodes is returned raw, including replies with no usable text.
    async fn analyze(&self, request: AnalysisRequest) -> Result<RawAnalysis>;

    /// Describe this provider for logging.
    fn description(&self) -> String;
}
