//! CLI execution runner.
//!
//! Builds the session from settings and arguments, ingests the requested
//! inputs, and drives a single audit to completion.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audit::{AuditEvent, AuditSession};
use crate::ingest::SelectedFile;
use crate::provider::GeminiProvider;
use crate::settings::{get_with_env_fallback, SettingsManager};

use super::args::Args;
use super::output::run_event_loop;

/// Build an audit session from CLI arguments and the settings file.
pub async fn initialize(args: &Args) -> Result<AuditSession> {
    let settings_manager = SettingsManager::new()
        .await
        .context("Failed to load settings")?;
    if let Err(e) = settings_manager.ensure_settings_file().await {
        tracing::warn!("Could not write settings template: {}", e);
    }
    let settings = settings_manager.get().await;

    let api_key = args
        .api_key
        .clone()
        .or_else(|| {
            get_with_env_fallback(
                &settings.analysis.api_key,
                &["CIRRUS_API_KEY", "GEMINI_API_KEY"],
                None,
            )
        })
        .context(
            "No API key configured: set analysis.api_key in settings or export GEMINI_API_KEY",
        )?;

    let model = args
        .model
        .clone()
        .unwrap_or_else(|| settings.analysis.model.clone());

    let mut provider = GeminiProvider::new(api_key, model);
    if let Some(base_url) = settings.analysis.base_url {
        provider = provider.with_base_url(base_url);
    }

    Ok(AuditSession::new(Arc::new(provider)))
}

/// Ingest every input named on the command line.
///
/// Files are read concurrently and ingested as one batch so allowlist
/// filtering applies to the selection as a whole.
pub async fn ingest_inputs(session: &AuditSession, args: &Args) -> Result<()> {
    if !args.files.is_empty() {
        let reads = args.files.iter().map(|path| async move {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unnamed")
                .to_string();
            Ok::<SelectedFile, anyhow::Error>(SelectedFile::new(name, bytes))
        });

        let files = try_join_all(reads).await?;
        session.ingest_files(files)?;
    }

    if let Some(archive_path) = &args.archive {
        let bytes = tokio::fs::read(archive_path)
            .await
            .with_context(|| format!("Failed to read {}", archive_path.display()))?;
        session.ingest_archive(bytes).await?;
    }

    if let Some(name) = &args.paste {
        let content = read_stdin_snippet()?;
        session.paste_snippet(name, &content);
    }

    if session.file_count() == 0 {
        anyhow::bail!("Nothing to audit: no inputs supplied");
    }

    Ok(())
}

/// Execute one audit and render its outcome.
///
/// The event loop runs in a background task and exits when it sees the
/// job's terminal event; a job-level failure becomes this process's error.
pub async fn execute_once(session: &AuditSession, args: &Args) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AuditEvent>();
    session.set_event_sink(event_tx);

    let json_mode = args.json;
    let quiet_mode = args.quiet;
    let output_handle: JoinHandle<Result<()>> =
        tokio::spawn(async move { run_event_loop(event_rx, json_mode, quiet_mode).await });

    session.submit().await;

    match output_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!("Output handler error: {}", e);
        }
        Err(e) => {
            tracing::warn!("Output handler panicked: {}", e);
        }
    }

    if let Some(message) = session.last_error() {
        anyhow::bail!(message);
    }
    Ok(())
}

/// Read pasted snippet content from stdin.
fn read_stdin_snippet() -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        anyhow::bail!("--paste expects snippet content on stdin");
    }

    let mut content = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut content)
        .context("Failed to read snippet from stdin")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::provider::gemini::DEFAULT_MODEL;

    fn offline_session() -> AuditSession {
        AuditSession::new(Arc::new(GeminiProvider::new("test-key", DEFAULT_MODEL)))
    }

    #[tokio::test]
    async fn ingest_inputs_reads_selected_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        tokio::fs::write(&path, "fn main() {}").await.unwrap();

        let session = offline_session();
        let args = Args::parse_from(["cirrus-cli", path.to_str().unwrap()]);

        ingest_inputs(&session, &args).await.unwrap();

        let files = session.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "main.rs");
        assert_eq!(files[0].content, "fn main() {}");
    }

    #[tokio::test]
    async fn ingest_inputs_rejects_empty_invocation() {
        let session = offline_session();
        let args = Args::parse_from(["cirrus-cli"]);

        let err = ingest_inputs(&session, &args).await.unwrap_err();
        assert!(err.to_string().contains("Nothing to audit"));
    }

    #[tokio::test]
    async fn ingest_inputs_surfaces_unsupported_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        tokio::fs::write(&path, [0u8, 1, 2]).await.unwrap();

        let session = offline_session();
        let args = Args::parse_from(["cirrus-cli", path.to_str().unwrap()]);

        let err = ingest_inputs(&session, &args).await.unwrap_err();
        assert!(err.to_string().contains("no supported files"));
    }

    #[tokio::test]
    async fn ingest_inputs_reads_archives() {
        use std::io::Write as _;

        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("app.ts", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"export {};").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        tokio::fs::write(&path, bytes).await.unwrap();

        let session = offline_session();
        let args = Args::parse_from(["cirrus-cli", "-z", path.to_str().unwrap()]);

        ingest_inputs(&session, &args).await.unwrap();
        assert_eq!(session.files()[0].name, "app.ts");
    }
}
