//! Centralized TOML-based settings system for Cirrus.
//!
//! Settings are loaded from `~/.cirrus/settings.toml` with environment
//! variable interpolation support. Values missing from the file fall back to
//! environment variables through the `get_with_env_fallback` helper.

pub mod loader;
pub mod schema;

pub use loader::{get_with_env_fallback, settings_path, SettingsManager};
pub use schema::{AnalysisSettings, CirrusSettings};
