//! Configuration for both pipelines.
//!
//! Settings are read from TOML files. Every field has a default, so an
//! empty or partial file is valid.
//!
//! # Configuration File Format
//!
//! ```toml
//! [group]
//! types = [".svg"]
//! keywords = ["IconArt", "Frame", "Doodad", "Window", "Button"]
//!
//! [rename]
//! output_dir = "sprites_done"
//! extension = ".svg"
//! ```

use crate::category::{CategoryRules, DEFAULT_KEYWORDS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Reserved output directory name shared by both pipelines.
pub const DEFAULT_OUTPUT_DIR: &str = "sprites_done";

/// Extension considered when none is configured.
pub const DEFAULT_EXTENSION: &str = ".svg";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A category keyword cannot be used as a prefix rule.
    InvalidKeyword {
        /// The offending keyword.
        keyword: String,
        /// Why it was rejected.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidKeyword { keyword, reason } => {
                write!(f, "Invalid category keyword '{}': {}", keyword, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorterConfig {
    /// Settings for grouping files by category.
    #[serde(default)]
    pub group: GroupSettings,

    /// Settings for renaming sprite export folders.
    #[serde(default)]
    pub rename: RenameSettings,
}

/// Settings for the category grouping pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Extensions to organize. Defaults to `[".svg"]`.
    #[serde(default = "default_types")]
    pub types: Vec<String>,

    /// Category keywords, checked in order.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

/// Settings for the folder renaming pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSettings {
    /// Name of the output directory inside the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Image extension to collect from each folder.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_types() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            types: default_types(),
            keywords: default_keywords(),
        }
    }
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
        }
    }
}

impl SorterConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.spritesortrc.toml` in the current directory
    /// 3. Look for `~/.config/spritesort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is malformed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".spritesortrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("spritesort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the configured keywords into a category rule table.
    pub fn category_rules(&self) -> Result<CategoryRules, ConfigError> {
        CategoryRules::from_keywords(&self.group.keywords)
    }

    /// Configured extensions, normalized.
    pub fn group_extensions(&self) -> Vec<String> {
        self.group
            .types
            .iter()
            .map(|t| normalize_extension(t))
            .collect()
    }
}

/// Normalizes an extension to lower case with exactly one leading dot.
///
/// ```
/// use spritesort::config::normalize_extension;
///
/// assert_eq!(normalize_extension("SVG"), ".svg");
/// assert_eq!(normalize_extension("..Png"), ".png");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.to_lowercase().trim_start_matches('.'))
}
