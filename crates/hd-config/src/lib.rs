//! Configuration management for helpdocs.
//!
//! Parses `helpdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [content]
//! root = "public"
//! default_language = "en"
//! languages = ["en", "es", "nl"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `content.root` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root directory.
    pub root: Option<PathBuf>,
    /// Override default language.
    pub default_language: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "helpdocs.toml";

/// Default content root, relative to the config directory.
const DEFAULT_ROOT: &str = "public";

/// Default language segment.
const DEFAULT_LANGUAGE: &str = "en";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    default_language: Option<String>,
    languages: Option<Vec<String>>,
}

/// Resolved content configuration with an absolute root.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding one `{language}/` tree per language.
    pub root: PathBuf,
    /// Language used when a reference has no language segment.
    pub default_language: String,
    /// Languages published on the site. Empty means only the default.
    pub languages: Vec<String>,
}

impl ContentConfig {
    /// Whether `language` is one of the published languages.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        if self.languages.is_empty() {
            return language == self.default_language;
        }
        self.languages.iter().any(|l| l == language)
    }

    /// Prefix a site reference with the default language unless its first
    /// segment is already a known language.
    ///
    /// ```
    /// use hd_config::ContentConfig;
    ///
    /// let content = ContentConfig {
    ///     default_language: "en".to_owned(),
    ///     languages: vec!["en".to_owned(), "es".to_owned()],
    ///     ..Default::default()
    /// };
    /// assert_eq!(content.localize("Content/A.htm"), "/en/Content/A.htm");
    /// assert_eq!(content.localize("/es/Content/A.htm"), "/es/Content/A.htm");
    /// ```
    #[must_use]
    pub fn localize(&self, reference: &str) -> String {
        let trimmed = reference.trim_start_matches('/');
        let first = trimmed.split('/').next().unwrap_or_default();
        if self.has_language(first) {
            format!("/{trimmed}")
        } else {
            format!("/{}/{trimmed}", self.default_language)
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.root`").
        field: String,
        /// Error message (e.g., "${`CONTENT_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a language code to be a single path segment.
fn require_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single path segment, got {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `helpdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.content_resolved.root.clone_from(root);
        }
        if let Some(language) = &settings.default_language {
            self.content_resolved.default_language.clone_from(language);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                root: base.join(DEFAULT_ROOT),
                default_language: DEFAULT_LANGUAGE.to_owned(),
                languages: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the default language is empty or
    /// not among the configured languages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;
        require_segment(&content.default_language, "content.default_language")?;
        for language in &content.languages {
            require_segment(language, "content.languages")?;
        }
        if !content.has_language(&content.default_language) {
            return Err(ConfigError::Validation(format!(
                "content.languages must include the default language {:?}",
                content.default_language
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.content.root {
            self.content.root = Some(expand::expand_env(root, "content.root")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.content;
        self.content_resolved = ContentConfig {
            root: config_dir.join(raw.root.as_deref().unwrap_or(DEFAULT_ROOT)),
            default_language: raw
                .default_language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            languages: raw.languages.clone().unwrap_or_default(),
        };
    }
}
