//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::render::svg::DEFAULT_CELL_SIZE;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COLOR_IDENT_CONFIG_PATH";

/// Which plain chat messages are read as guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiddlewareMode {
    /// Only explicit commands are accepted.
    Disabled,
    /// Any message that looks like a coordinate is a guess.
    Enabled,
    /// Only direct messages or messages mentioning the bot are read.
    #[default]
    Restricted,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Interception policy for plain chat messages.
    pub middleware: MiddlewareMode,
    /// Pixels per grid unit in rendered puzzles.
    pub cell_size: u32,
    /// Fixed seed for the puzzle generator; random when absent.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        middleware = ?app_config.middleware,
                        cell_size = app_config.cell_size,
                        seeded = app_config.seed.is_some(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; missing fields take their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            middleware: MiddlewareMode::default(),
            cell_size: DEFAULT_CELL_SIZE,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    middleware: MiddlewareMode,
    #[serde(default = "default_cell_size")]
    cell_size: u32,
    #[serde(default)]
    seed: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            middleware: value.middleware,
            cell_size: value.cell_size,
            seed: value.seed,
        }
    }
}

fn default_cell_size() -> u32 {
    DEFAULT_CELL_SIZE
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
