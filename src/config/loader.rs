//! Configuration file loading with precedence handling.

use crate::model::{ColorAssignment, ColorPair, ColorRole};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Name of the environment variable holding an alternative config path.
pub const CONFIG_ENV: &str = "PIPEVIEW_CONFIG";

/// Name of the environment variable overriding the line format.
pub const FORMAT_ENV: &str = "PIPEVIEW_FORMAT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, directory in the way).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pipeview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Jump a full page when the selection leaves the window.
    #[serde(default)]
    pub pager_mode: Option<bool>,

    /// Keep the selection on the newest line as input arrives.
    #[serde(default)]
    pub follow: Option<bool>,

    /// Line format template (`%s` = line, `%n` = line number).
    #[serde(default)]
    pub format: Option<String>,

    /// Columns moved per horizontal scroll key.
    #[serde(default)]
    pub horizontal_step: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Show the top bar (watched command).
    #[serde(default)]
    pub top_bar: Option<bool>,

    /// Show the bottom bar (status line).
    #[serde(default)]
    pub bottom_bar: Option<bool>,

    /// Per-role color overrides.
    #[serde(default)]
    pub colors: Option<ColorsSection>,
}

/// Colors section from TOML.
///
/// ```toml
/// [colors.selected]
/// fg = "black"
/// bg = "yellow"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColorsSection {
    /// Colors for the top bar.
    #[serde(default)]
    pub top_bar: Option<ColorEntry>,
    /// Colors for the bottom bar.
    #[serde(default)]
    pub bottom_bar: Option<ColorEntry>,
    /// Colors for the command line.
    #[serde(default)]
    pub command: Option<ColorEntry>,
    /// Colors for the selected row.
    #[serde(default)]
    pub selected: Option<ColorEntry>,
    /// Colors for unselected rows.
    #[serde(default)]
    pub normal: Option<ColorEntry>,
}

impl ColorsSection {
    fn entry(&self, role: ColorRole) -> Option<&ColorEntry> {
        match role {
            ColorRole::TopBar => self.top_bar.as_ref(),
            ColorRole::BottomBar => self.bottom_bar.as_ref(),
            ColorRole::Command => self.command.as_ref(),
            ColorRole::Selected => self.selected.as_ref(),
            ColorRole::Normal => self.normal.as_ref(),
        }
    }

    /// Apply every entry present onto `colors`.
    pub fn apply_to(&self, colors: &mut ColorAssignment) {
        for role in ColorRole::ALL {
            if let Some(entry) = self.entry(role) {
                colors.set(role, ColorPair::from_names(&entry.fg, &entry.bg));
            }
        }
    }
}

/// Foreground/background color names for one role.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColorEntry {
    /// Foreground color name.
    pub fg: String,
    /// Background color name.
    pub bg: String,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Jump a full page when the selection leaves the window.
    pub pager_mode: bool,
    /// Keep the selection on the last line as input arrives.
    pub follow: bool,
    /// Line format template (`%n` line number, `%s` text).
    pub format: String,
    /// Columns moved per horizontal scroll key.
    pub horizontal_step: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Show the top bar.
    pub top_bar: bool,
    /// Show the bottom bar.
    pub bottom_bar: bool,
    /// Colors per screen role.
    pub colors: ColorAssignment,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            pager_mode: false,
            follow: false,
            format: "%s".to_string(),
            horizontal_step: 8,
            log_file_path: default_log_path(),
            top_bar: true,
            bottom_bar: true,
            colors: ColorAssignment::default(),
        }
    }
}

/// Overrides taken from command line flags. `None` leaves the value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--format`.
    pub format: Option<String>,
    /// `--pager`.
    pub pager_mode: Option<bool>,
    /// `--follow`.
    pub follow: Option<bool>,
    /// `--no-top-bar`, stored inverted.
    pub top_bar: Option<bool>,
    /// `--no-bottom-bar`, stored inverted.
    pub bottom_bar: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pipeview/pipeview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pipeview").join("pipeview.log")
    } else {
        PathBuf::from("pipeview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pipeview/config.toml` on Unix, appropriate path on
/// other platforms, or `None` if no config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pipeview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PIPEVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/pipeview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `PIPEVIEW_FORMAT` for the line format.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(format) = std::env::var(FORMAT_ENV) {
        config.format = format;
    }
    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let mut colors = defaults.colors;
    if let Some(section) = &config.colors {
        section.apply_to(&mut colors);
    }

    ResolvedConfig {
        pager_mode: config.pager_mode.unwrap_or(defaults.pager_mode),
        follow: config.follow.unwrap_or(defaults.follow),
        format: config.format.unwrap_or(defaults.format),
        horizontal_step: config
            .horizontal_step
            .filter(|step| *step > 0)
            .unwrap_or(defaults.horizontal_step),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        top_bar: config.top_bar.unwrap_or(defaults.top_bar),
        bottom_bar: config.bottom_bar.unwrap_or(defaults.bottom_bar),
        colors,
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags that were explicitly set by the user are applied.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(pager) = cli.pager_mode {
        config.pager_mode = pager;
    }
    if let Some(follow) = cli.follow {
        config.follow = follow;
    }
    if let Some(top) = cli.top_bar {
        config.top_bar = top;
    }
    if let Some(bottom) = cli.bottom_bar {
        config.bottom_bar = bottom;
    }
    config
}

/// Resolve the full configuration: file, then environment, then CLI.
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed.
pub fn resolve(
    config_path: Option<PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    Ok(apply_cli_overrides(config, cli))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
