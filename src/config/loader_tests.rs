//! Tests for configuration file loading.

use super::*;
use ratatui::style::Color;
use serial_test::serial;
use std::env;
use std::fs;

/// Write `contents` to a uniquely named file in the temp dir.
fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("pipeview_test_{}.toml", name));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_ends_with_pipeview_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("pipeview") && path_str.ends_with("config.toml"),
        "Path should contain 'pipeview' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_pipeview_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("pipeview.log"),
        "Default log path should end with 'pipeview.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = temp_config(
        "valid",
        r#"
pager_mode = true
follow = true
format = "%n: %s"
horizontal_step = 4
top_bar = false

[colors.selected]
fg = "black"
bg = "yellow"
"#,
    );

    let config = load_config_file(&path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.pager_mode, Some(true));
    assert_eq!(config.follow, Some(true));
    assert_eq!(config.format.as_deref(), Some("%n: %s"));
    assert_eq!(config.horizontal_step, Some(4));
    assert_eq!(config.top_bar, Some(false));
    assert_eq!(config.bottom_bar, None);
    let selected = config.colors.and_then(|c| c.selected).unwrap();
    assert_eq!(selected.bg, "yellow");

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = temp_config("invalid", "this is not valid TOML ][}{");

    match load_config_file(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let path = temp_config("unknown", "wrap_lines = true\n");
    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::ParseError { .. })
    ));
    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_reports_unreadable_path() {
    // A directory exists but cannot be read as a file.
    let dir = env::temp_dir().join("pipeview_test_config_dir.toml");
    fs::create_dir_all(&dir).unwrap();
    assert!(matches!(
        load_config_file(&dir),
        Err(ConfigError::ReadError { .. })
    ));
    fs::remove_dir(dir).ok();
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        pager_mode: Some(true),
        follow: Some(true),
        format: Some("[%n] %s".to_string()),
        horizontal_step: Some(2),
        log_file_path: Some(PathBuf::from("/custom/path/to/app.log")),
        top_bar: Some(false),
        bottom_bar: Some(false),
        colors: None,
    };

    let resolved = merge_config(Some(config_file));

    assert!(resolved.pager_mode);
    assert!(resolved.follow);
    assert_eq!(resolved.format, "[%n] %s");
    assert_eq!(resolved.horizontal_step, 2);
    assert_eq!(resolved.log_file_path, PathBuf::from("/custom/path/to/app.log"));
    assert!(!resolved.top_bar);
    assert!(!resolved.bottom_bar);
}

#[test]
fn merge_config_uses_defaults_for_none_fields() {
    let config_file = ConfigFile {
        follow: Some(true),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();

    assert!(resolved.follow);
    assert_eq!(resolved.format, defaults.format);
    assert_eq!(resolved.horizontal_step, defaults.horizontal_step);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
    assert_eq!(resolved.colors, defaults.colors);
}

#[test]
fn merge_config_ignores_zero_horizontal_step() {
    let config_file = ConfigFile {
        horizontal_step: Some(0),
        ..ConfigFile::default()
    };
    assert_eq!(merge_config(Some(config_file)).horizontal_step, 8);
}

#[test]
fn merge_config_applies_color_entries() {
    let config_file = ConfigFile {
        colors: Some(ColorsSection {
            normal: Some(ColorEntry {
                fg: "green".to_string(),
                bg: "black".to_string(),
            }),
            top_bar: Some(ColorEntry {
                fg: "white".to_string(),
                bg: "no-such-color".to_string(),
            }),
            ..ColorsSection::default()
        }),
        ..ConfigFile::default()
    };

    let colors = merge_config(Some(config_file)).colors;

    assert_eq!(
        colors.get(ColorRole::Normal),
        ColorPair::new(Color::Green, Color::Black)
    );
    assert_eq!(
        colors.get(ColorRole::TopBar),
        ColorPair::new(Color::White, Color::Black),
        "unknown color names fall back to black"
    );
    assert_eq!(
        colors.get(ColorRole::Selected),
        ColorAssignment::default().get(ColorRole::Selected)
    );
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
/// Removes the var on drop, preventing test pollution in parallel execution.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(pipeview_format)]
fn apply_env_overrides_respects_pipeview_format() {
    let _guard = EnvGuard::new(FORMAT_ENV);
    env::set_var(FORMAT_ENV, "%n %s");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result.format, "%n %s", "PIPEVIEW_FORMAT should override format");
}

#[test]
#[serial(pipeview_format)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(FORMAT_ENV);

    let base = ResolvedConfig::default();
    let result = apply_env_overrides(base.clone());

    assert_eq!(
        result, base,
        "Config should be unchanged when PIPEVIEW_FORMAT not set"
    );
}

#[test]
#[serial(pipeview_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let explicit_path = temp_config("explicit", "format = \"explicit\"\n");
    let env_path = temp_config("env", "format = \"env\"\n");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(
        config.format.as_deref(),
        Some("explicit"),
        "Should use explicit path, not PIPEVIEW_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(pipeview_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let env_path = temp_config("env_only", "format = \"from-env\"\n");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(
        config.format.as_deref(),
        Some("from-env"),
        "Should use PIPEVIEW_CONFIG when no explicit path"
    );

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(pipeview_config)]
fn load_config_with_precedence_missing_env_file_is_not_an_error() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    env::set_var(CONFIG_ENV, "/nonexistent/pipeview/config.toml");

    assert_eq!(load_config_with_precedence(None), Ok(None));
}

#[test]
fn apply_cli_overrides_only_touches_set_flags() {
    let base = ResolvedConfig {
        follow: true,
        ..ResolvedConfig::default()
    };

    let result = apply_cli_overrides(
        base.clone(),
        CliOverrides {
            pager_mode: Some(true),
            bottom_bar: Some(false),
            ..CliOverrides::default()
        },
    );

    assert!(result.pager_mode);
    assert!(!result.bottom_bar);
    assert!(result.follow, "unset flag keeps file/env value");
    assert_eq!(result.format, base.format);
    assert_eq!(result.top_bar, base.top_bar);
}

#[test]
#[serial(pipeview_format)]
fn cli_format_beats_environment() {
    let _guard = EnvGuard::new(FORMAT_ENV);
    env::set_var(FORMAT_ENV, "env");

    let config = apply_env_overrides(merge_config(None));
    let config = apply_cli_overrides(
        config,
        CliOverrides {
            format: Some("cli".to_string()),
            ..CliOverrides::default()
        },
    );

    assert_eq!(config.format, "cli");
}

#[test]
#[serial(pipeview_config)]
fn resolve_reads_explicit_file_and_cli() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let path = temp_config("resolve", "pager_mode = true\nfollow = true\n");

    let config = resolve(
        Some(path.clone()),
        CliOverrides {
            follow: Some(false),
            ..CliOverrides::default()
        },
    )
    .unwrap();

    assert!(config.pager_mode);
    assert!(!config.follow);

    fs::remove_file(path).ok();
}
