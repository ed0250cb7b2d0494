//! Settings schema definitions for Cirrus configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial configuration files.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::provider::gemini::DEFAULT_MODEL;

/// Root settings structure for Cirrus.
///
/// Loaded from `~/.cirrus/settings.toml` with environment variable
/// interpolation support. Version field enables future migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CirrusSettings {
    /// Schema version for migrations
    pub version: u32,

    /// Analysis provider configuration
    pub analysis: AnalysisSettings,
}

impl Default for CirrusSettings {
    fn default() -> Self {
        Self {
            version: 1,
            analysis: AnalysisSettings::default(),
        }
    }
}

/// Analysis provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Model used for audit generation
    pub model: String,

    /// API key (supports $ENV_VAR syntax)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL for API-compatible proxies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = CirrusSettings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.analysis.model, DEFAULT_MODEL);
        assert!(settings.analysis.api_key.is_none());
        assert!(settings.analysis.base_url.is_none());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let settings: CirrusSettings = toml::from_str(
            r#"
            [analysis]
            model = "gemini-custom"
            "#,
        )
        .unwrap();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.analysis.model, "gemini-custom");
        assert!(settings.analysis.api_key.is_none());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let settings: CirrusSettings = toml::from_str("").unwrap();
        assert_eq!(settings.analysis.model, DEFAULT_MODEL);
    }
}
