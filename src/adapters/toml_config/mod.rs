// TOML config adapter - Configuration file loading (TOML or YAML)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipLyError, ClipLyResult};
use crate::utils::logging::{LogFormat, LogLevel};

/// Settings that shape a run; presets are fixed and deliberately absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Encoding tool name or file name looked up by the locator
    pub ffmpeg: String,
    /// Probing tool name or file name looked up by the locator
    pub ffprobe: String,
    /// Bundled tool directory searched before anything else
    pub bundled_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            bundled_dir: None,
        }
    }
}

impl AppConfig {
    /// Reject values the locator could never resolve
    pub fn validate(&self) -> ClipLyResult<()> {
        for (key, value) in [("ffmpeg", &self.ffmpeg), ("ffprobe", &self.ffprobe)] {
            if value.trim().is_empty() {
                return Err(ClipLyError::config(format!("{} tool name cannot be empty", key)));
            }
        }
        Ok(())
    }
}

/// On-disk layout: settings live under a `[cliply]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cliply: AppConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// File names probed in the working directory, in order
    pub const LOCAL_CANDIDATES: &'static [&'static str] = &["cliply.toml", "cliply.yaml", "cliply.yml"];

    /// Per-user config file location
    pub fn default_config_path() -> PathBuf {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            PathBuf::from(appdata).join("ClipLy").join("config.toml")
        } else if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("cliply").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config").join("cliply").join("config.toml")
        } else {
            PathBuf::from("cliply.toml")
        }
    }

    /// Load the explicit file if given, else the first candidate that exists
    ///
    /// A missing explicit file is an error; missing candidates are not.
    pub fn discover(explicit: Option<&Path>) -> ClipLyResult<Option<(PathBuf, AppConfig)>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ClipLyError::config(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Ok(Some((path.to_path_buf(), Self::load_file(path)?)));
        }

        let candidates = Self::LOCAL_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .chain(std::iter::once(Self::default_config_path()));

        for candidate in candidates {
            if candidate.is_file() {
                let config = Self::load_file(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }

        Ok(None)
    }

    /// Load a config file, choosing the parser by extension
    pub fn load_file(path: &Path) -> ClipLyResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClipLyError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let config = if is_yaml {
            Self::parse_yaml(&content)?
        } else {
            Self::parse_toml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn parse_toml(content: &str) -> ClipLyResult<AppConfig> {
        toml::from_str::<ConfigFile>(content)
            .map(|file| file.cliply)
            .map_err(|e| ClipLyError::config(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn parse_yaml(content: &str) -> ClipLyResult<AppConfig> {
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        serde_yaml::from_str::<ConfigFile>(content)
            .map(|file| file.cliply)
            .map_err(|e| ClipLyError::config(format!("Failed to parse YAML config: {}", e)))
    }
}
