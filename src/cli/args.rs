//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for cirrus-cli.

use clap::Parser;
use std::path::PathBuf;

/// Cirrus CLI - Headless driver for the grounded code-audit engine
#[derive(Parser, Debug, Clone)]
#[command(name = "cirrus-cli")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Source files to ingest (filtered by the supported-extension allowlist)
    pub files: Vec<PathBuf>,

    /// ZIP archive to ingest
    #[arg(short = 'z', long)]
    pub archive: Option<PathBuf>,

    /// Read a snippet from stdin and add it under NAME
    /// (pass an empty string to auto-name it)
    #[arg(long, value_name = "NAME")]
    pub paste: Option<String>,

    /// Override model from settings
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API key (overrides settings and env vars)
    #[arg(long, env = "CIRRUS_API_KEY")]
    pub api_key: Option<String>,

    /// Output lifecycle events as JSON lines (for scripting/parsing)
    #[arg(long)]
    pub json: bool,

    /// Only output the final report (suppress lifecycle chatter)
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["cirrus-cli"]);
        assert!(args.files.is_empty());
        assert!(args.archive.is_none());
        assert!(args.paste.is_none());
        assert!(!args.json);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_positional_files() {
        let args = Args::parse_from(["cirrus-cli", "src/main.rs", "lib.py"]);
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.files[0], PathBuf::from("src/main.rs"));
    }

    #[test]
    fn test_args_archive_flag() {
        let args = Args::parse_from(["cirrus-cli", "-z", "bundle.zip"]);
        assert_eq!(args.archive, Some(PathBuf::from("bundle.zip")));
    }

    #[test]
    fn test_args_paste_accepts_empty_name() {
        let args = Args::parse_from(["cirrus-cli", "--paste", ""]);
        assert_eq!(args.paste, Some(String::new()));
    }

    #[test]
    fn test_args_model_override() {
        let args = Args::parse_from(["cirrus-cli", "-m", "gemini-custom", "a.rs"]);
        assert_eq!(args.model, Some("gemini-custom".to_string()));
    }

    #[test]
    fn test_args_output_modes() {
        let args = Args::parse_from(["cirrus-cli", "--json", "--quiet"]);
        assert!(args.json);
        assert!(args.quiet);
    }
}
