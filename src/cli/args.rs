// CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

/// Color output modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(()),
        }
    }
}

impl ColorMode {
    /// Resolve against the terminal; `Auto` follows `console`'s detection
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => console::colors_enabled(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        }
    }
}

/// Colorized, line-oriented test progress reporter
#[derive(Parser, Debug, Default)]
#[command(name = "progress-reporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render test lifecycle events as colorized progress output", long_about = None)]
pub struct Cli {
    /// JSON-lines event stream to replay (`-` or omitted reads stdin)
    #[arg(required = false)]
    pub events: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Log every lifecycle event
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Disable colored output
    #[arg(short = 'c', long, default_value_t = false)]
    pub no_color: bool,

    /// Color mode (auto, always, never)
    #[arg(long, value_name = "WHEN", value_parser = ["auto", "always", "never"])]
    pub color: Option<String>,

    /// Flush the output after every write
    #[arg(long, default_value_t = false)]
    pub auto_flush: bool,

    /// HTML-escape output written to stdout
    #[arg(long, default_value_t = false)]
    pub html_escape: bool,

    /// Mirror all output into the CI echo buffer
    #[arg(long, default_value_t = false)]
    pub ci_echo: bool,

    /// Write the collected CI echo buffer to this file when the run ends
    #[arg(long, value_name = "FILE")]
    pub ci_echo_output: Option<PathBuf>,

    /// Terminal width
    #[arg(long, value_name = "N")]
    pub columns: Option<usize>,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Install shell completion (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

impl Cli {
    /// Color mode requested on the command line, if any
    pub fn color_mode(&self) -> Option<ColorMode> {
        if self.no_color {
            return Some(ColorMode::Never);
        }
        self.color.as_deref().and_then(|value| value.parse().ok())
    }

    /// Event stream path, `None` for stdin
    pub fn events_path(&self) -> Option<&PathBuf> {
        self.events
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}
