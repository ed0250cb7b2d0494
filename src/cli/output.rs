//! CLI output handling - Event receiver loop.
//!
//! Receives lifecycle events from the audit session and renders them based
//! on output mode (terminal, JSON, or quiet). The loop exits when it sees a
//! terminal event (completed or failed).

use std::io::{self, Write};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::audit::{AuditEvent, GroundingSource};

/// Run the event loop, processing events until completion or failure.
///
/// # Arguments
///
/// * `event_rx` - Channel receiver for audit events
/// * `json_mode` - If true, output events as JSON lines
/// * `quiet_mode` - If true, only output the final report
pub async fn run_event_loop(
    mut event_rx: mpsc::UnboundedReceiver<AuditEvent>,
    json_mode: bool,
    quiet_mode: bool,
) -> Result<()> {
    while let Some(event) = event_rx.recv().await {
        if json_mode {
            println!("{}", serde_json::to_string(&event)?);
            io::stdout().flush()?;
        } else if !quiet_mode {
            render_terminal(&event)?;
        }

        match event {
            AuditEvent::Completed { report, .. } => {
                if quiet_mode && !json_mode {
                    println!("{}", report);
                }
                break;
            }
            AuditEvent::Failed { message } => {
                if !json_mode {
                    eprintln!("Error: {}", message);
                }
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Render one event for terminal (non-JSON) output.
fn render_terminal(event: &AuditEvent) -> Result<()> {
    match event {
        AuditEvent::Started {
            job_id,
            asset_count,
        } => {
            eprintln!("[audit] Job {} started over {} asset(s)", job_id, asset_count);
        }
        AuditEvent::Completed {
            report,
            sources,
            duration_ms,
        } => {
            eprintln!("[audit] Completed in {}ms", duration_ms);
            println!("{}", report);
            print_sources(sources);
        }
        // Failure text is handled by the main loop.
        AuditEvent::Failed { .. } => {}
    }

    Ok(())
}

fn print_sources(sources: &[GroundingSource]) {
    if sources.is_empty() {
        return;
    }

    println!();
    println!("Sources:");
    for source in sources {
        println!(
            "  - {} <{}>",
            source.title.as_deref().unwrap_or("Untitled source"),
            source.uri
        );
    }
}
