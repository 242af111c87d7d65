// Diagnostic logging - kept on stderr so it never interleaves with the report

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::cli::Cli;
use crate::config::Config;

/// `<emoji> LEVEL [HH:MM:SS]: message` event format
pub struct CustomFormatter;

/// Emoji and label for a level
pub fn level_prefix(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::TRACE => ("🔬", "TRACE"),
        Level::DEBUG => ("🐛", "DEBUG"),
        Level::INFO => ("ℹ️ ", "INFO"),
        Level::WARN => ("⚠️ ", "WARN"),
        Level::ERROR => ("❌", "ERROR"),
    }
}

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (emoji, level_str) = level_prefix(event.metadata().level());
        let timestamp = Local::now().format("%H:%M:%S");

        write!(writer, "{} {} [{}]: ", emoji, level_str, timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Default filter directive
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "progress_reporter=debug,warn"
    } else {
        "progress_reporter=warn,error"
    }
}

/// Debug-level logging is wanted for `--verbose` or `--debug`, from either
/// the command line or the configuration file
pub fn wants_debug(cli: &Cli, config: Option<&Config>) -> bool {
    cli.verbose
        || cli.debug
        || config.is_some_and(|cfg| cfg.reporter.verbose || cfg.reporter.debug)
}

/// Install the global subscriber; `RUST_LOG` overrides the default filter
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A second initialisation (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .event_format(CustomFormatter)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_prefix() {
        assert_eq!(level_prefix(&Level::ERROR), ("❌", "ERROR"));
        assert_eq!(level_prefix(&Level::DEBUG).1, "DEBUG");
    }

    #[test]
    fn test_debug_flag_alone_enables_debug_filter() {
        let cli = Cli {
            debug: true,
            ..Cli::default()
        };
        assert!(wants_debug(&cli, None));
        assert!(default_filter(wants_debug(&cli, None)).contains("progress_reporter=debug"));
    }

    #[test]
    fn test_debug_from_config() {
        let mut config = Config::default();
        config.reporter.debug = true;
        assert!(wants_debug(&Cli::default(), Some(&config)));
        assert!(!wants_debug(&Cli::default(), Some(&Config::default())));
        assert!(!wants_debug(&Cli::default(), None));
    }

    #[test]
    fn test_default_filter() {
        assert!(default_filter(true).contains("progress_reporter=debug"));
        assert!(default_filter(false).contains("progress_reporter=warn"));
    }
}
