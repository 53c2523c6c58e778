use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ExtractError;
use crate::graph::EdgeStrategy;

/// Top-level settings, constructed once at startup and passed by reference
/// into the components that need them. There is no global configuration
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Upper bound on the number of corpus documents processed per run.
    /// `None` processes the whole corpus.
    #[serde(default = "default_document_limit")]
    pub document_limit: Option<usize>,
    #[serde(default)]
    pub edge_strategy: EdgeStrategy,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            document_limit: default_document_limit(),
            edge_strategy: EdgeStrategy::default(),
        }
    }
}

fn default_temperature() -> f32 { 0.0 }
fn default_max_tokens() -> u32 { 2048 }
fn default_timeout() -> u64 { 120 }
fn default_max_retries() -> u32 { 1 }
fn default_document_limit() -> Option<usize> { Some(100) }

impl Settings {
    /// Load settings from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ExtractError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        let settings: Settings = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .map_err(|e| ExtractError::Config(format!("invalid JSON config: {}", e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| ExtractError::Config(format!("invalid YAML config: {}", e)))?
        };

        Ok(settings)
    }

    /// Validate required keys. Absence of a required key is fatal.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.llm.base_url.is_empty() {
            return Err(ExtractError::Config("llm.base_url must not be empty".to_string()));
        }
        if self.llm.model.is_empty() {
            return Err(ExtractError::Config("llm.model must not be empty".to_string()));
        }
        if self.llm.max_tokens == 0 {
            return Err(ExtractError::Config("llm.max_tokens must be positive".to_string()));
        }
        Ok(())
    }

    /// Create an example configuration.
    pub fn example() -> Self {
        Settings {
            llm: LlmSettings {
                base_url: "https://api.openai.com".to_string(),
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                temperature: 0.0,
                max_tokens: 2048,
                timeout: 120,
                max_retries: 1,
            },
            extraction: ExtractionSettings {
                document_limit: Some(100),
                edge_strategy: EdgeStrategy::Overwrite,
            },
        }
    }
}

impl LlmSettings {
    /// API key from the config file, falling back to `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "llm:\n  base_url: http://localhost:8000\n  model: gpt-4o-mini\nextraction:\n  document_limit: 5\n  edge_strategy: accumulate"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.llm.base_url, "http://localhost:8000");
        assert_eq!(settings.llm.temperature, 0.0);
        assert_eq!(settings.llm.max_tokens, 2048);
        assert_eq!(settings.extraction.document_limit, Some(5));
        assert_eq!(settings.extraction.edge_strategy, EdgeStrategy::Accumulate);
        settings.validate().unwrap();
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "llm:\n  base_url: http://localhost:8000").unwrap();

        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut settings = Settings::example();
        settings.llm.model = String::new();
        assert!(matches!(settings.validate(), Err(ExtractError::Config(_))));
    }

    #[test]
    fn test_example_defaults() {
        let settings = Settings::example();
        settings.validate().unwrap();
        assert_eq!(settings.extraction.document_limit, Some(100));
        assert_eq!(settings.extraction.edge_strategy, EdgeStrategy::Overwrite);
    }
}
