//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/rf/config.toml.

use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::output::{print_line, with_stdout};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
const CONFIG_ENV: &str = "RF_CONFIG";

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# rf - row filter configuration

# Config schema version (do not modify)
version = 1

# Reading datasets
[input]
# delimiter = ","           # Single character separating fields

# Presenting matches
[output]
# page_size = 50            # Rows printed before pausing
# pause = true              # Wait for Enter between pages
# color = true              # Enable colors (respects NO_COLOR env)

# Evaluating predicates
[filter]
# parallel = false          # Evaluate rows on all cores
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            input: InputConfig::default(),
            output: OutputConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

/// Input configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field delimiter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rows per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Pause between pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause: Option<bool>,

    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Filter configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Evaluate rows in parallel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

/// Settings after applying defaults to the config file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub delimiter: char,
    pub page_size: usize,
    pub pause: bool,
    pub color: bool,
    pub parallel: bool,
}

impl Config {
    /// Fills every unset value with its default.
    pub fn settings(&self) -> Settings {
        Settings {
            delimiter: self.input.delimiter.unwrap_or(DEFAULT_DELIMITER),
            page_size: self.output.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            pause: self.output.pause.unwrap_or(true),
            color: self.output.color.unwrap_or(true),
            parallel: self.filter.parallel.unwrap_or(false),
        }
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/rf/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("rf"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("rf"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
///
/// Files written by a newer rf are rejected rather than reinterpreted.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Unsupported config version {} (this rf supports up to {}). Upgrade rf or run 'rf config init --force'",
            config.version, CONFIG_VERSION
        )));
    }

    // Version 1 is the initial schema
    config.version = CONFIG_VERSION;
    if let Some(delimiter) = config.input.delimiter {
        check_delimiter(delimiter)?;
    }
    Ok(config)
}

/// Creates the parent directory of the config file if needed.
fn ensure_config_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    Ok(())
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;
    ensure_config_dir(&path)?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;
    let settings = config.settings();

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": settings,
        });
        print_line(&serde_json::to_string_pretty(&output)?)?;
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        with_stdout(|out| {
            let header = "Configuration";
            if ctx.use_colors {
                writeln!(out, "{}\n", header.green().bold())?;
            } else {
                writeln!(out, "{}\n", header)?;
            }

            writeln!(out, "File: {}", path.display())?;
            writeln!(out, "Exists: {}", path.exists())?;

            writeln!(out, "\n[input]")?;
            writeln!(out, "  delimiter: {:?}", settings.delimiter)?;

            writeln!(out, "\n[output]")?;
            writeln!(out, "  page_size: {}", settings.page_size)?;
            writeln!(out, "  pause: {}", settings.pause)?;
            writeln!(out, "  color: {}", settings.color)?;

            writeln!(out, "\n[filter]")?;
            writeln!(out, "  parallel: {}", settings.parallel)?;

            if !path.exists() {
                writeln!(
                    out,
                    "\n(No config file exists. Run 'rf config init' to create one.)"
                )?;
            }
            Ok(())
        })?;
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies `key = value` to a config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let Some((section, field)) = key.split_once('.') else {
        return Err(unknown_key(key));
    };

    match (section, field) {
        ("input", "delimiter") => {
            config.input.delimiter = Some(parse_delimiter(value)?);
        }
        ("output", "page_size") => {
            config.output.page_size = Some(parse_page_size(value)?);
        }
        ("output", "pause") => {
            config.output.pause = Some(parse_bool(value)?);
        }
        ("output", "color") => {
            config.output.color = Some(parse_bool(value)?);
        }
        ("filter", "parallel") => {
            config.filter.parallel = Some(parse_bool(value)?);
        }
        _ => return Err(unknown_key(key)),
    }

    Ok(())
}

fn unknown_key(key: &str) -> CommandError {
    CommandError::Config(format!(
        "Unknown config key '{}'. Valid keys: input.delimiter, output.page_size, output.pause, output.color, filter.parallel",
        key
    ))
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        print_line(&serde_json::to_string_pretty(&output)?)?;
    } else if !ctx.quiet {
        print_line(&format!("Set {} = {}", opts.key, opts.value))?;
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        print_line(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_line(&path.display().to_string())?;
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        )));
    }

    ensure_config_dir(&path)?;
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        print_line(&serde_json::to_string_pretty(&output)?)?;
    } else if !ctx.quiet {
        print_line(&format!("Created default config at: {}", path.display()))?;
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

/// Parses a single-character delimiter. `\t` is accepted for tab.
fn parse_delimiter(s: &str) -> Result<char> {
    if s == "\\t" {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => check_delimiter(c),
        _ => Err(CommandError::Config(format!(
            "Invalid delimiter '{}'. Use a single character",
            s
        ))),
    }
}

fn check_delimiter(c: char) -> Result<char> {
    if c.is_ascii() {
        Ok(c)
    } else {
        Err(CommandError::Config(format!(
            "Invalid delimiter '{}'. Use a single ASCII character",
            c
        )))
    }
}

/// Parses a page size, which must be positive.
pub fn parse_page_size(s: &str) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(CommandError::Config(format!(
            "Invalid page size '{}'. Use a positive integer",
            s
        ))),
        Ok(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    /// Points RF_CONFIG at a temp file for the duration of `f`.
    fn with_config_path<F: FnOnce(&std::path::Path)>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, &path);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&path)));

        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }
        if let Err(panic) = result {
            std::panic::resume_unwind(panic);
        }
    }

    #[test]
    fn test_parse_bool_true_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("True").unwrap());
        assert!(parse_bool("yes").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(parse_bool("on").unwrap());
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(!parse_bool("no").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("off").unwrap());
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
        assert!(parse_bool("2").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter("|").unwrap(), '|');
        assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("25").unwrap(), 25);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("-1").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = Config::default().settings();
        assert_eq!(
            settings,
            Settings {
                delimiter: ',',
                page_size: 50,
                pause: true,
                color: true,
                parallel: false,
            }
        );
    }

    #[test]
    fn test_config_deserialization() {
        let config = parse_config(
            r#"
version = 1

[input]
delimiter = ";"

[output]
page_size = 20
pause = false

[filter]
parallel = true
"#,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.delimiter, ';');
        assert_eq!(settings.page_size, 20);
        assert!(!settings.pause);
        assert!(settings.color);
        assert!(settings.parallel);
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config = parse_config("").unwrap();
        // Missing version defaults to current version
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.settings(), Config::default().settings());
    }

    #[test]
    fn test_config_rejects_long_delimiter() {
        let err = parse_config("[input]\ndelimiter = \"::\"\n").unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_default_config_template_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.settings(), Config::default().settings());
    }

    #[test]
    fn test_migrate_config_accepts_current_version() {
        let config = parse_config("version = 1\n").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_migrate_config_rejects_newer_version() {
        let err = parse_config("version = 999\n").unwrap_err();
        match err {
            CommandError::Config(message) => {
                assert!(message.contains("Unsupported config version 999"), "{message}");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_rejects_non_ascii_delimiter() {
        let err = parse_config("[input]\ndelimiter = \"é\"\n").unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let mut config = Config::default();
        config.output.page_size = Some(10);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("page_size = 10"));
        assert!(!toml_str.contains("pause"));
        assert!(!toml_str.contains("delimiter"));
    }

    #[test]
    fn test_apply_setting_valid_keys() {
        let mut config = Config::default();
        apply_setting(&mut config, "input.delimiter", "|").unwrap();
        apply_setting(&mut config, "output.page_size", "5").unwrap();
        apply_setting(&mut config, "output.pause", "off").unwrap();
        apply_setting(&mut config, "output.color", "no").unwrap();
        apply_setting(&mut config, "filter.parallel", "yes").unwrap();

        assert_eq!(
            config.settings(),
            Settings {
                delimiter: '|',
                page_size: 5,
                pause: false,
                color: false,
                parallel: true,
            }
        );
    }

    #[test]
    fn test_apply_setting_unknown_key() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "delimiter", ",").is_err());
        assert!(apply_setting(&mut config, "output.format", "json").is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        with_config_path(|path| {
            assert_eq!(get_config_path().unwrap(), path);
        });
    }

    #[test]
    #[serial]
    fn test_load_missing_config_gives_defaults() {
        with_config_path(|_| {
            let config = load_config().unwrap();
            assert_eq!(config.settings(), Config::default().settings());
        });
    }

    #[test]
    #[serial]
    fn test_set_then_load() {
        with_config_path(|path| {
            let opts = ConfigSetOptions {
                key: "output.page_size".to_string(),
                value: "7".to_string(),
            };
            execute_set(&quiet_ctx(), &opts).unwrap();
            assert!(path.exists());

            let config = load_config().unwrap();
            assert_eq!(config.settings().page_size, 7);
        });
    }

    #[test]
    #[serial]
    fn test_init_refuses_to_overwrite_without_force() {
        with_config_path(|path| {
            execute_init(&quiet_ctx(), false).unwrap();
            assert_eq!(fs::read_to_string(path).unwrap(), DEFAULT_CONFIG);

            let err = execute_init(&quiet_ctx(), false).unwrap_err();
            assert!(matches!(err, CommandError::Config(_)));

            fs::write(path, "version = 1\n").unwrap();
            execute_init(&quiet_ctx(), true).unwrap();
            assert_eq!(fs::read_to_string(path).unwrap(), DEFAULT_CONFIG);
        });
    }
}
