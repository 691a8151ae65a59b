//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::error::ClipLyResult;
use crate::utils::logging::{LogFormat, LogLevel};

/// Values given on the command line; `None` leaves lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub ffmpeg: Option<String>,
    pub ffprobe: Option<String>,
    pub bundled_dir: Option<PathBuf>,
}

/// Environment variables and the setting each one overrides
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("CLIPLY_LOG_LEVEL", "log_level"),
    ("CLIPLY_LOG_FORMAT", "log_format"),
    ("CLIPLY_FFMPEG", "ffmpeg"),
    ("CLIPLY_FFPROBE", "ffprobe"),
    ("CLIPLY_BUNDLE_DIR", "bundled_dir"),
];

/// Resolve configuration following precedence: CLI > Env > File > Defaults
///
/// Runs before logging is installed, so it reports what it loaded in its return
/// value instead of logging it.
pub fn initialize_configuration_hierarchy(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> ClipLyResult<(AppConfig, Option<PathBuf>)> {
    let (mut config, source) = match TomlConfigAdapter::discover(config_path)? {
        Some((path, config)) => (config, Some(path)),
        None => (AppConfig::default(), None),
    };

    apply_environment(&mut config, |key| std::env::var(key).ok())?;
    apply_overrides(&mut config, overrides);
    config.validate()?;

    Ok((config, source))
}

/// Apply `CLIPLY_*` variables through `lookup`
pub fn apply_environment<F>(config: &mut AppConfig, lookup: F) -> ClipLyResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    for (env_var, key) in ENV_MAPPINGS {
        let Some(value) = lookup(env_var) else {
            continue;
        };
        match *key {
            "log_level" => config.log_level = value.parse()?,
            "log_format" => config.log_format = value.parse()?,
            "ffmpeg" => config.ffmpeg = value,
            "ffprobe" => config.ffprobe = value,
            "bundled_dir" => config.bundled_dir = Some(PathBuf::from(value)),
            _ => continue,
        }
        applied += 1;
    }

    Ok(applied)
}

/// Apply command-line overrides
pub fn apply_overrides(config: &mut AppConfig, overrides: &ConfigOverrides) {
    if let Some(level) = overrides.log_level {
        config.log_level = level;
    }
    if let Some(format) = overrides.log_format {
        config.log_format = format;
    }
    if let Some(ffmpeg) = &overrides.ffmpeg {
        config.ffmpeg = ffmpeg.clone();
    }
    if let Some(ffprobe) = &overrides.ffprobe {
        config.ffprobe = ffprobe.clone();
    }
    if let Some(dir) = &overrides.bundled_dir {
        config.bundled_dir = Some(dir.clone());
    }
}

/// Log where the effective configuration came from
pub fn log_configuration(config: &AppConfig, source: Option<&Path>) {
    match source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!(
        "Tools: ffmpeg={} ffprobe={} bundle={}",
        config.ffmpeg,
        config.ffprobe,
        config
            .bundled_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<exe>/bin".to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut config = AppConfig {
            ffmpeg: "from-file".to_string(),
            ..AppConfig::default()
        };

        let applied = apply_environment(
            &mut config,
            env(&[("CLIPLY_FFMPEG", "from-env"), ("CLIPLY_LOG_LEVEL", "trace")]),
        )
        .unwrap();

        assert_eq!(applied, 2);
        assert_eq!(config.ffmpeg, "from-env");
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.ffprobe, "ffprobe");
    }

    #[test]
    fn test_invalid_environment_value_is_rejected() {
        let mut config = AppConfig::default();
        assert!(apply_environment(&mut config, env(&[("CLIPLY_LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_cli_overrides_environment() {
        let mut config = AppConfig::default();
        apply_environment(&mut config, env(&[("CLIPLY_BUNDLE_DIR", "/env/bin")])).unwrap();
        apply_overrides(
            &mut config,
            &ConfigOverrides {
                bundled_dir: Some(PathBuf::from("/cli/bin")),
                log_format: Some(LogFormat::Json),
                ..ConfigOverrides::default()
            },
        );

        assert_eq!(config.bundled_dir, Some(PathBuf::from("/cli/bin")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &ConfigOverrides::default());
        assert_eq!(config, AppConfig::default());
    }
}
