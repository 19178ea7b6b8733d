// Configuration loading and parsing (hub.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub research: ResearchConfig,
    pub ui: UiConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// hub.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire hub.toml file.
#[derive(Debug, Clone, Deserialize)]
struct HubFile {
    api: ApiConfig,
    research: ResearchConfig,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote data/AI service; endpoints are appended verbatim.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    /// Ordered category list the Initialize action researches.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// How many API log entries the log panel shows.
    pub log_panel_entries: usize,
    /// How many API log entries are retained in memory.
    pub api_log_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            log_panel_entries: 5,
            api_log_capacity: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

/// Auth material for the remote service. All three values are sent as fixed
/// headers on every gateway call; with any of them missing the gateway runs
/// in disabled mode.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub api_token: Option<String>,
    pub app_id: Option<String>,
    pub usage_key: Option<String>,
}

impl CredentialsConfig {
    /// Whether a complete set of credentials is present.
    pub fn is_complete(&self) -> bool {
        fn filled(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.is_empty())
        }
        filled(&self.api_token) && filled(&self.app_id) && filled(&self.usage_key)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/hub.toml` and (optionally)
/// `config/credentials.toml`, both relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- hub.toml (required) ---
    let hub_path = config_dir.join("hub.toml");
    let hub_text = read_file(&hub_path)?;
    let hub_file: HubFile = toml::from_str(&hub_text).map_err(|e| ConfigError::ParseError {
        path: hub_path.clone(),
        source: e,
    })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        api: hub_file.api,
        research: hub_file.research,
        ui: hub_file.ui,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if !target.exists() {
            std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to copy {} to config/: {e}", path.display()),
            })?;
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Load configuration from the current directory, copying defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = std::env::current_dir().map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to determine current directory: {e}"),
    })?;
    ensure_config_files(&base_dir)?;
    load_config_from(&base_dir)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: "base URL must not be empty".into(),
        });
    }
    if config.research.categories.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "research.categories".into(),
            message: "at least one research category is required".into(),
        });
    }
    if config.ui.api_log_capacity == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.api_log_capacity".into(),
            message: "API log capacity must be at least 1".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hub(text: &str) -> Result<HubFile, toml::de::Error> {
        toml::from_str(text)
    }

    const MINIMAL_HUB: &str = r#"
        [api]
        base_url = "https://example.test/api_tools"

        [research]
        categories = ["Finance software", "HR software"]
    "#;

    #[test]
    fn hub_toml_parses_with_default_ui_section() {
        let hub = parse_hub(MINIMAL_HUB).unwrap();
        assert_eq!(hub.api.base_url, "https://example.test/api_tools");
        assert_eq!(hub.research.categories.len(), 2);
        assert_eq!(hub.ui.log_panel_entries, 5);
        assert_eq!(hub.ui.api_log_capacity, 10);
    }

    #[test]
    fn credentials_complete_requires_all_three() {
        let mut creds = CredentialsConfig::default();
        assert!(!creds.is_complete());

        creds.api_token = Some("t".into());
        creds.app_id = Some("a".into());
        assert!(!creds.is_complete());

        creds.usage_key = Some("u".into());
        assert!(creds.is_complete());

        creds.app_id = Some(String::new());
        assert!(!creds.is_complete());
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let hub = parse_hub(MINIMAL_HUB).unwrap();
        let config = Config {
            api: ApiConfig {
                base_url: "  ".into(),
            },
            research: hub.research,
            ui: hub.ui,
            credentials: CredentialsConfig::default(),
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn validate_rejects_empty_category_list() {
        let hub = parse_hub(MINIMAL_HUB).unwrap();
        let config = Config {
            api: hub.api,
            research: ResearchConfig { categories: vec![] },
            ui: hub.ui,
            credentials: CredentialsConfig::default(),
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { field, .. }) if field == "research.categories"
        ));
    }
}
