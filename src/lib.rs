//! Cirrus: a grounded code-audit engine.
//!
//! Normalizes heterogeneous source inputs (ZIP archives, selected files,
//! pasted snippets) into one ordered collection, runs a single-in-flight
//! analysis job against an external grounded-generation provider, and
//! validates the returned report and citation sources.
//!
//! Presentation concerns (rendering, progress cosmetics, export) live
//! elsewhere; this crate owns the state machine and the boundary.

pub mod audit;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod ingest;
pub mod provider;
pub mod settings;

pub use audit::{AuditEvent, AuditSession, AuditStatus, GroundingSource};
pub use error::{AuditError, Result};
pub use ingest::{CodeAsset, SelectedFile};
pub use provider::{AnalysisProvider, AnalysisRequest};
