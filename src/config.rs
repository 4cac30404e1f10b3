//! Optional user configuration (`config.toml`).
//!
//! Loading never fails the run: anything unusable becomes a warning and the
//! built-in default is kept.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use steekproef_core::{ControlSheet, DEFAULT_OUTPUT_PREFIX, check_sheet_name};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    control_sheet: Option<String>,
    seed_column: Option<String>,
    output_prefix: Option<String>,
    log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub control: ControlSheet,
    pub output_prefix: String,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            control: ControlSheet::default(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            log_level: None,
        }
    }
}

/// Load the config file given on the command line, or the user's default one
/// if it exists. Returns the config plus any warnings.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (Config::default(), warnings);
        }
    };

    let config = parse_config(&content, &mut warnings);
    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "steekproef")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn parse_config(content: &str, warnings: &mut Vec<String>) -> Config {
    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse config: {}", err));
            return Config::default();
        }
    };

    let mut config = Config::default();

    if let Some(name) = file.control_sheet {
        match check_sheet_name(&name) {
            Ok(()) => config.control.sheet_name = name,
            Err(reason) => warnings.push(format!("Ignoring control_sheet '{}': {}", name, reason)),
        }
    }

    if let Some(column) = file.seed_column {
        if column.is_empty() {
            warnings.push("Ignoring seed_column: must not be empty".to_string());
        } else {
            config.control.seed_column = column;
        }
    }

    if let Some(prefix) = file.output_prefix {
        if prefix.contains(['/', '\\']) {
            warnings.push(format!(
                "Ignoring output_prefix '{}': must not contain path separators",
                prefix
            ));
        } else {
            config.output_prefix = prefix;
        }
    }

    if let Some(level) = file.log_level {
        let level = level.trim().to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(format!(
                "Ignoring log_level '{}': expected one of {}",
                level,
                LOG_LEVELS.join(", ")
            ));
        }
    }

    config
}
