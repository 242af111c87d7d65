// Main entry point for progress-reporter

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use progress_reporter::cli::Cli;
use progress_reporter::commands::{handle_completion, run_events};
use progress_reporter::config::{self, Config, ReporterSettings};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file (if exists); errors are reported once
    // logging is up, since the file also decides the log level
    let loaded = Config::load();
    let config = loaded.as_ref().ok().cloned().flatten();

    let debug_logging = progress_reporter::logging::wants_debug(&cli, config.as_ref());
    progress_reporter::logging::init(debug_logging);

    if let Err(err) = &loaded {
        warn!("Ignoring configuration: {}", err);
    }

    if debug_logging {
        info!("Starting progress-reporter v{}", env!("CARGO_PKG_VERSION"));
    }

    let settings = ReporterSettings::resolve(&cli, config.as_ref());

    // Handle config flag
    if cli.config {
        print_configuration(&settings, config.is_some());
        return Ok(());
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        let toml_content = Config::default().to_toml();
        std::fs::write(config_file, toml_content).with_context(|| {
            format!("Failed to write configuration file: {}", config_file.display())
        })?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return handle_completion(shell_type);
    }

    run_events(&cli, &settings)
}

fn print_configuration(settings: &ReporterSettings, file_loaded: bool) {
    println!("Current configuration:");
    println!("    Color: {} ({})", settings.color.as_str(), if settings.color_enabled { "enabled" } else { "disabled" });
    println!("    Columns: {}", settings.columns);
    println!("    Verbose: {}", settings.verbose);
    println!("    Debug: {}", settings.debug);
    println!("    Auto flush: {}", settings.auto_flush);
    println!("    HTML escape: {}", settings.html_escape_output);
    println!("    CI echo: {}", settings.ci_echo_enabled);
    if let Some(ref path) = settings.ci_echo_output {
        println!("    CI echo output: {}", path.display());
    }

    if file_loaded {
        println!("\n  Configuration file loaded");
    } else {
        println!("\n  No configuration file loaded");
        println!("  Create one with: progress-reporter --init-config .progressreporterrc.toml");
    }

    println!("\n  Environment variables:");
    match std::env::var(&settings.ci_env_var) {
        Ok(value) => println!(
            "    {}: {} ({})",
            settings.ci_env_var,
            value,
            if config::is_truthy(&value) { "CI echo on" } else { "ignored" }
        ),
        Err(_) => println!("    {}: not set", settings.ci_env_var),
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
