//! Audit session state and job orchestration.
//!
//! `AuditSession` is the single owner of everything a run accumulates: the
//! ordered asset collection, the in-flight flag, and the outcome slots
//! (report, sources, error). Collection mutations are synchronous and may
//! interleave with an in-flight job; the job works on a snapshot taken at
//! submission, and commits its result only if no reset happened in between.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::ingest::{self, archive, CodeAsset, SelectedFile};
use crate::provider::{AnalysisProvider, AnalysisRequest};

use super::events::AuditEvent;
use super::interpreter::{self, GroundingSource};

/// Serializable snapshot of the session for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct AuditStatus {
    pub files: Vec<CodeAsset>,
    pub is_auditing: bool,
    pub report: Option<String>,
    pub sources: Vec<GroundingSource>,
    pub error: Option<String>,
}

/// Owned session object for one audit workflow.
///
/// Invariants: `report` and `error` are never both set; the in-flight flag is
/// true only strictly between submission and resolution; at most one job runs
/// at a time.
pub struct AuditSession {
    files: RwLock<Vec<CodeAsset>>,
    auditing: RwLock<bool>,
    report: RwLock<Option<String>>,
    sources: RwLock<Vec<GroundingSource>>,
    error: RwLock<Option<String>>,

    /// Bumped by `reset()`. A job captures the value at submission and
    /// commits its result only if it still matches, so a resolution arriving
    /// after a reset can never resurrect stale state.
    epoch: AtomicU64,

    provider: Arc<dyn AnalysisProvider>,
    event_tx: RwLock<Option<mpsc::UnboundedSender<AuditEvent>>>,
}

impl AuditSession {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            files: RwLock::new(Vec::new()),
            auditing: RwLock::new(false),
            report: RwLock::new(None),
            sources: RwLock::new(Vec::new()),
            error: RwLock::new(None),
            epoch: AtomicU64::new(0),
            provider,
            event_tx: RwLock::new(None),
        }
    }

    /// Attach a channel for lifecycle events.
    pub fn set_event_sink(&self, tx: mpsc::UnboundedSender<AuditEvent>) {
        *self.event_tx.write() = Some(tx);
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Extract a ZIP archive and append every qualifying entry.
    ///
    /// On failure the collection is left exactly as it was and the error is
    /// recorded in the session's error slot.
    pub async fn ingest_archive(&self, bytes: Vec<u8>) -> Result<usize> {
        *self.error.write() = None;

        match archive::extract_archive(bytes).await {
            Ok(assets) => {
                let count = assets.len();
                self.files.write().extend(assets);
                Ok(count)
            }
            Err(e) => {
                *self.error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Append directly selected files that pass the allowlist.
    ///
    /// Fails (and records the error) when no input qualifies; prior assets
    /// are never discarded.
    pub fn ingest_files(&self, files: Vec<SelectedFile>) -> Result<usize> {
        *self.error.write() = None;

        match ingest::decode_selected(files) {
            Ok(assets) => {
                let count = assets.len();
                self.files.write().extend(assets);
                Ok(count)
            }
            Err(e) => {
                *self.error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Append a manually pasted snippet.
    ///
    /// Manual entry is trusted, so there is no allowlist check.
    /// Whitespace-only content is a silent no-op. An empty name gets a
    /// synthetic `Snippet-N` identifier derived from the collection size.
    pub fn paste_snippet(&self, name: &str, content: &str) {
        if content.trim().is_empty() {
            return;
        }

        let mut files = self.files.write();
        let name = if name.is_empty() {
            format!("Snippet-{}", files.len() + 1)
        } else {
            name.to_string()
        };
        files.push(CodeAsset::new(name, content));
    }

    /// Rename the asset at `index`, content unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers validate indices.
    pub fn rename_asset(&self, index: usize, new_name: impl Into<String>) {
        self.files.write()[index].name = new_name.into();
    }

    /// Remove the asset at `index`, shifting later assets down.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; callers validate indices.
    pub fn remove_asset(&self, index: usize) {
        self.files.write().remove(index);
    }

    // ========================================================================
    // Job lifecycle
    // ========================================================================

    /// Run one analysis job over the current collection.
    ///
    /// Silent no-op when the collection is empty or a job is already in
    /// flight. Exactly one boundary call is made per accepted submission; no
    /// retry, no timeout. The result is committed only if the session was not
    /// reset while the call was pending.
    pub async fn submit(&self) {
        let assets: Vec<CodeAsset> = self.files.read().clone();
        if assets.is_empty() {
            tracing::debug!("[audit] Submit ignored: collection is empty");
            return;
        }

        {
            let mut auditing = self.auditing.write();
            if *auditing {
                tracing::debug!("[audit] Submit ignored: a job is already in flight");
                return;
            }
            *auditing = true;
        }

        *self.report.write() = None;
        self.sources.write().clear();
        *self.error.write() = None;

        let epoch = self.epoch.load(Ordering::Acquire);
        let job_id = uuid::Uuid::new_v4().to_string();
        let request = AnalysisRequest::new(build_contents(&assets));

        tracing::info!(
            "[audit] Job {} submitted: {} asset(s) via {}",
            job_id,
            assets.len(),
            self.provider.description()
        );
        self.emit(AuditEvent::Started {
            job_id: job_id.clone(),
            asset_count: assets.len(),
        });

        let start = Instant::now();
        let result = self
            .provider
            .analyze(request)
            .await
            .and_then(interpreter::interpret);

        if self.epoch.load(Ordering::Acquire) != epoch {
            tracing::debug!("[audit] Job {} resolved after reset; result dropped", job_id);
            return;
        }

        match result {
            Ok(outcome) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                *self.report.write() = Some(outcome.report.clone());
                *self.sources.write() = outcome.sources.clone();
                *self.auditing.write() = false;

                tracing::info!(
                    "[audit] Job {} completed in {}ms with {} source(s)",
                    job_id,
                    duration_ms,
                    outcome.sources.len()
                );
                self.emit(AuditEvent::Completed {
                    report: outcome.report,
                    sources: outcome.sources,
                    duration_ms,
                });
            }
            Err(e) => {
                let message = e.to_string();
                *self.error.write() = Some(message.clone());
                *self.auditing.write() = false;

                tracing::warn!("[audit] Job {} failed: {}", job_id, message);
                self.emit(AuditEvent::Failed { message });
            }
        }
    }

    /// Clear the whole session: collection, report, sources, error, flag.
    ///
    /// Safe to call at any time, including while a job is in flight; the
    /// in-flight job's eventual resolution is discarded.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);

        self.files.write().clear();
        *self.report.write() = None;
        self.sources.write().clear();
        *self.error.write() = None;
        *self.auditing.write() = false;

        tracing::debug!("[audit] Session reset");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn files(&self) -> Vec<CodeAsset> {
        self.files.read().clone()
    }

    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_auditing(&self) -> bool {
        *self.auditing.read()
    }

    pub fn report(&self) -> Option<String> {
        self.report.read().clone()
    }

    pub fn sources(&self) -> Vec<GroundingSource> {
        self.sources.read().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Full snapshot for presentation layers.
    pub fn status(&self) -> AuditStatus {
        AuditStatus {
            files: self.files(),
            is_auditing: self.is_auditing(),
            report: self.report(),
            sources: self.sources(),
            error: self.last_error(),
        }
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(tx) = self.event_tx.read().as_ref() {
            let _ = tx.send(event);
        }
    }
}

/// Assemble the outbound payload from a collection snapshot.
///
/// Each asset is framed as `FILE [<name>]:` followed by its content and a
/// `---` terminator; frames are joined by a blank line, in collection order.
pub fn build_contents(assets: &[CodeAsset]) -> String {
    assets
        .iter()
        .map(|asset| format!("FILE [{}]:\n{}\n---", asset.name, asset.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
