//! Cirrus CLI - Headless driver for the grounded code-audit engine
//!
//! # Usage
//!
//! ```bash
//! # Audit a handful of files
//! cirrus-cli src/main.rs src/lib.rs
//!
//! # Audit a whole archive
//! cirrus-cli -z bundle.zip
//!
//! # Pipe a snippet in under a name
//! cat snippet.rs | cirrus-cli --paste helper.rs
//!
//! # JSON lifecycle events for scripting
//! cirrus-cli --json src/main.rs | jq .
//!
//! # Quiet mode - only the final report
//! cirrus-cli -q src/main.rs
//! ```
//!
//! The API key is resolved from `--api-key`, then the settings file, then the
//! `CIRRUS_API_KEY`/`GEMINI_API_KEY` environment variables.

use anyhow::Result;
use clap::Parser;

use cirrus_lib::cli::{execute_once, ingest_inputs, initialize, Args};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let directive = if args.verbose {
        "cirrus_lib=debug"
    } else {
        "cirrus_lib=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = initialize(&args).await?;
    ingest_inputs(&session, &args).await?;
    execute_once(&session, &args).await
}
