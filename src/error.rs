use thiserror::Error;

/// Failure taxonomy for ingestion and analysis operations.
///
/// Every variant is a value, not an abort: callers record the message in the
/// session's error slot and stay interactive.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("archive parsing failed: {0}")]
    ArchiveParse(String),

    #[error("no valid code assets detected in archive")]
    NoValidAssets,

    #[error("no supported files selected")]
    NoSupportedFiles,

    #[error("analysis returned an empty report")]
    EmptyReport,

    #[error("analysis provider error: {0}")]
    Boundary(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
