// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::cli::{Cli, ColorMode};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reporter: ReporterConfig,

    #[serde(default)]
    pub ci: CiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Color mode (auto, always, never)
    #[serde(default = "default_color")]
    pub color: String,

    /// Terminal width
    #[serde(default = "default_columns")]
    pub columns: usize,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub debug: bool,

    /// Flush after every write
    #[serde(default)]
    pub auto_flush: bool,

    /// HTML-escape output written to stdout
    #[serde(default)]
    pub html_escape: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            columns: default_columns(),
            verbose: false,
            debug: false,
            auto_flush: false,
            html_escape: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiConfig {
    /// Always mirror output into the CI echo buffer
    #[serde(default)]
    pub echo: bool,

    /// Environment variable that enables CI echo when truthy
    #[serde(default = "default_ci_env_var")]
    pub env_var: String,

    /// File the CI echo buffer is written to at the end of the run
    #[serde(default)]
    pub echo_output: Option<String>,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            echo: false,
            env_var: default_ci_env_var(),
            echo_output: None,
        }
    }
}

// Default values
pub const ENV_CI_ECHO: &str = "TDDIUM";

pub fn default_color() -> String {
    String::from("auto")
}

pub fn default_columns() -> usize {
    80
}

pub fn default_ci_env_var() -> String {
    String::from(ENV_CI_ECHO)
}

/// Truthiness of an environment value: set, non-empty and not `0`
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub const CONFIG_FILE_NAMES: [&str; 2] = [".progressreporterrc", ".progressreporterrc.toml"];

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();
        Self::load_from_dirs(cwd.as_deref(), home.as_deref())
    }

    /// Load the first configuration file found in `cwd`, then `home`.
    ///
    /// Both file names are tried in each directory before moving on, so a
    /// project file always wins over one in the home directory.
    pub fn load_from_dirs(
        cwd: Option<&Path>,
        home: Option<&Path>,
    ) -> Result<Option<Self>, ConfigError> {
        for dir in [cwd, home].into_iter().flatten() {
            for name in CONFIG_FILE_NAMES {
                let path = dir.join(name);
                if path.is_file() {
                    return Self::load_from_file(&path).map(Some);
                }
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

/// Reporter configuration resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterSettings {
    pub color: ColorMode,
    pub color_enabled: bool,
    pub columns: usize,
    pub verbose: bool,
    pub debug: bool,
    pub auto_flush: bool,
    pub html_escape_output: bool,
    pub ci_echo_enabled: bool,
    pub ci_echo_output: Option<PathBuf>,
    pub ci_env_var: String,
}

impl ReporterSettings {
    /// Resolve settings from the process environment
    pub fn resolve(cli: &Cli, config: Option<&Config>) -> Self {
        Self::resolve_with(cli, config, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    ///
    /// Precedence: command line, configuration file, environment, defaults.
    pub fn resolve_with<F>(cli: &Cli, config: Option<&Config>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = config.unwrap_or(&defaults);

        let config_color = match config.reporter.color.parse::<ColorMode>() {
            Ok(mode) => mode,
            Err(()) => {
                warn!(
                    "Unknown color mode '{}' in configuration, using auto",
                    config.reporter.color
                );
                ColorMode::Auto
            }
        };
        let color = cli.color_mode().unwrap_or(config_color);

        let ci_env_var = config.ci.env_var.clone();
        let ci_from_env = env(&ci_env_var).is_some_and(|value| is_truthy(&value));

        let html_escape = cli.html_escape || config.reporter.html_escape;
        if html_escape && cli.output.is_some() {
            warn!("HTML escaping only applies to stdout and is ignored with --output");
        }

        Self {
            color,
            color_enabled: color.enabled(),
            columns: cli.columns.unwrap_or(config.reporter.columns),
            verbose: cli.verbose || config.reporter.verbose,
            debug: cli.debug || config.reporter.debug,
            auto_flush: cli.auto_flush || config.reporter.auto_flush,
            html_escape_output: html_escape && cli.output.is_none(),
            // Asking for the echo file on the command line implies echo.
            ci_echo_enabled: cli.ci_echo
                || cli.ci_echo_output.is_some()
                || config.ci.echo
                || ci_from_env,
            ci_echo_output: cli
                .ci_echo_output
                .clone()
                .or_else(|| config.ci.echo_output.as_ref().map(PathBuf::from)),
            ci_env_var,
        }
    }
}
