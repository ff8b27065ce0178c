//! wifiqr runtime configuration handling

use crate::error::{Error, Result};
use crate::render::DEFAULT_QR_SIZE;
use crate::theme::DEFAULT_THEME_KEY;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure read from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Where documents are written
    pub output: OutputOptions,
    /// Document defaults
    pub render: RenderSettings,
}

impl AppConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No wifiqr.toml / wifiqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["wifiqr.toml", "wifiqr.yaml", "wifiqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("wifiqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        read_structured(path, "config")
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.logging.apply_env_overrides();
        self.output.apply_env_overrides();
        self.render.apply_env_overrides();
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `WIFIQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("WIFIQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("WIFIQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("WIFIQR_LOG_COLOR") {
            if let Some(parsed) = parse_flag(&color) {
                self.color = parsed;
            }
        }
        if let Ok(rotation) = env::var("WIFIQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory receiving generated documents
    pub dir: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("WIFIQR_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.dir = PathBuf::from(dir);
            }
        }
    }
}

/// Document defaults merged under command-line overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Theme key
    pub theme: String,
    /// QR edge as a fraction of the page width (0.2-0.5)
    pub qr_size: f32,
    /// Title override
    pub title: Option<String>,
    /// Subtitle override; derived from the security mode when unset
    pub subtitle: Option<String>,
    /// Print the footer line
    pub show_footer: bool,
    /// Logo embedded in the QR code
    pub logo: Option<PathBuf>,
    /// Theme table location
    pub themes_file: PathBuf,
    /// Dotenv file holding the credentials
    pub env_file: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_KEY.to_string(),
            qr_size: DEFAULT_QR_SIZE,
            title: None,
            subtitle: None,
            show_footer: true,
            logo: None,
            themes_file: PathBuf::from("themes.yaml"),
            env_file: PathBuf::from(".env"),
        }
    }
}

impl RenderSettings {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(theme) = env::var("WIFIQR_THEME") {
            self.theme = theme;
        }
        if let Ok(path) = env::var("WIFIQR_THEMES_FILE") {
            self.themes_file = PathBuf::from(path);
        }
    }
}

/// Read a TOML or YAML file, picking the format from the extension.
///
/// `kind` names the file in error messages. Every failure is a configuration error.
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {kind} file {}: {e}", path.display()))
    })?;

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "toml" => toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {kind} TOML {}: {e}", path.display()))
        }),
        "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {kind} YAML {}: {e}", path.display()))
        }),
        other => Err(Error::Config(format!(
            "Unsupported {kind} format '{other}' for {}, expected toml/yaml",
            path.display()
        ))),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}
