// Run command - replay an event stream through the progress reporter

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::ReporterSettings;
use crate::events;
use crate::report::{ConsoleWriter, EchoCollector, ProgressReporter};

/// Build the console writer described by `settings`
pub fn build_writer(
    sink: Box<dyn Write>,
    settings: &ReporterSettings,
    collector: Option<&EchoCollector>,
) -> ConsoleWriter {
    let writer = ConsoleWriter::new(sink)
        .with_color(settings.color_enabled)
        .with_auto_flush(settings.auto_flush)
        .with_html_escape(settings.html_escape_output);

    match collector {
        Some(collector) => writer.with_echo(collector.clone()),
        None => writer,
    }
}

pub fn run_events(cli: &Cli, settings: &ReporterSettings) -> Result<()> {
    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    let collector = settings.ci_echo_enabled.then(EchoCollector::new);
    if collector.is_some() {
        info!("CI echo enabled");
    } else if let Some(path) = &settings.ci_echo_output {
        warn!(
            "CI echo is disabled, {} will not be written (set {} or pass --ci-echo)",
            path.display(),
            settings.ci_env_var
        );
    }

    let writer = build_writer(sink, settings, collector.as_ref());
    let mut reporter = ProgressReporter::new(writer)
        .with_ci_echo(settings.ci_echo_enabled)
        .with_debug(settings.debug);

    let summary = match cli.events_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event stream: {}", path.display()))?;
            events::replay(BufReader::new(file), &mut reporter)?
        }
        None => events::replay(io::stdin().lock(), &mut reporter)?,
    };

    info!(
        "Replayed {} event(s), {} test(s), {} assertion(s)",
        summary.events,
        reporter.tally().tests,
        reporter.num_assertions()
    );

    if let (Some(collector), Some(path)) = (&collector, &settings.ci_echo_output) {
        std::fs::write(path, collector.contents())
            .with_context(|| format!("Failed to write CI echo buffer: {}", path.display()))?;
        info!("CI echo buffer written to {}", path.display());
    }

    Ok(())
}
