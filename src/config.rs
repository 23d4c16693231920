use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::db::Backend;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    Argument,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::Argument => write!(f, "argument"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the recipe store
    pub store_path: ConfigValue<PathBuf>,
    /// Store backend; `None` means inferred from the store path extension
    pub backend: ConfigValue<Option<Backend>>,
    /// Where `grocery` writes its list by default
    pub grocery_file: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    backend: Option<Backend>,
    grocery_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut store_path = ConfigValue::new(
            Self::default_data_dir().join("recipes.jsonl"),
            ConfigSource::Default,
        );
        let mut backend = ConfigValue::new(None, ConfigSource::Default);
        let mut grocery_file = ConfigValue::new(PathBuf::from("grocery.txt"), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(store) = file_config.store_path {
                // Resolve relative paths against config file's directory
                let resolved = if store.is_relative() {
                    path.parent().map(|p| p.join(&store)).unwrap_or(store)
                } else {
                    store
                };
                store_path = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(kind) = file_config.backend {
                backend = ConfigValue::new(Some(kind), ConfigSource::File);
            }
            if let Some(file) = file_config.grocery_file {
                grocery_file = ConfigValue::new(file, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(store) = std::env::var("RECIPE_DRAWER_STORE_PATH") {
            store_path = ConfigValue::new(PathBuf::from(store), ConfigSource::Environment);
        }
        if let Ok(kind) = std::env::var("RECIPE_DRAWER_BACKEND") {
            let parsed = Backend::parse(&kind).ok_or_else(|| {
                ConfigError::InvalidValue("RECIPE_DRAWER_BACKEND".to_string(), kind.clone())
            })?;
            backend = ConfigValue::new(Some(parsed), ConfigSource::Environment);
        }
        if let Ok(file) = std::env::var("RECIPE_DRAWER_GROCERY_FILE") {
            grocery_file = ConfigValue::new(PathBuf::from(file), ConfigSource::Environment);
        }

        Ok(Self {
            store_path,
            backend,
            grocery_file,
            config_file,
        })
    }

    /// Point the store somewhere else for this invocation (`--db`).
    pub fn with_store_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.store_path = ConfigValue::new(path, ConfigSource::Argument);
        }
        self
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/recipe-drawer/
    /// - macOS: ~/Library/Application Support/recipe-drawer/
    /// - Windows: %APPDATA%/recipe-drawer/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipe-drawer")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/recipe-drawer/
    /// - macOS: ~/Library/Application Support/recipe-drawer/
    /// - Windows: %APPDATA%/recipe-drawer/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipe-drawer")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(
                    f,
                    "Invalid value '{}' for {} (expected 'jsonl' or 'sqlite')",
                    value, key
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
