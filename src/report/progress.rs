// Progress reporter - one colored token per test outcome

use std::time::Duration;

use tracing::debug;

use super::writer::{ConsoleWriter, LineWriter};
use super::{Result, TestOutcomeListener};
use crate::report::style::StyleAttr;
use crate::state::{Fault, Outcome, RunTally, TestInfo};

/// Line-oriented progress reporter
///
/// Prints a `Starting test` header per test followed by its outcome token.
/// The only per-test state is whether an outcome other than PASS was already
/// reported, and which test was started last.
pub struct ProgressReporter<W: LineWriter = ConsoleWriter> {
    writer: W,
    ci_echo: bool,
    debug: bool,
    last_test_failed: bool,
    last_test_name: String,
    tally: RunTally,
}

impl<W: LineWriter> ProgressReporter<W> {
    /// Create new progress reporter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            ci_echo: false,
            debug: false,
            last_test_failed: false,
            last_test_name: String::new(),
            tally: RunTally::default(),
        }
    }

    /// Print full fault descriptions to the primary output
    pub fn with_ci_echo(mut self, enabled: bool) -> Self {
        self.ci_echo = enabled;
        self
    }

    /// Log every lifecycle event at debug level
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn last_test_failed(&self) -> bool {
        self.last_test_failed
    }

    pub fn last_test_name(&self) -> &str {
        &self.last_test_name
    }

    /// Assertions accumulated over all finished tests
    pub fn num_assertions(&self) -> u64 {
        self.tally.assertions
    }

    pub fn tally(&self) -> &RunTally {
        &self.tally
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_token(&mut self, outcome: Outcome) -> Result<()> {
        self.writer.write_with_color(outcome.style(), outcome.label())?;
        self.tally.record(outcome);
        self.last_test_failed |= outcome.is_failure_class();
        Ok(())
    }

    fn report_fault(&mut self, outcome: Outcome, test: &TestInfo, fault: &Fault) -> Result<()> {
        if self.debug {
            debug!(test = %test.describe(), outcome = %outcome, "{}", fault.message);
        }

        self.write_token(outcome)?;

        if self.ci_echo {
            self.writer.print(&format!("\n{}", fault.description()))?;
        }
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        let tally = &self.tally;
        let (attrs, text): (&[StyleAttr], String) = if tally.tests == 0 {
            (
                &[StyleAttr::FgBlack, StyleAttr::BgYellow],
                "No tests executed!".to_string(),
            )
        } else if tally.was_successful() && !tally.has_notices() {
            (
                &[StyleAttr::FgBlack, StyleAttr::BgGreen],
                format!(
                    "OK ({} test{}, {} assertion{})",
                    tally.tests,
                    plural(tally.tests),
                    tally.assertions,
                    plural(tally.assertions)
                ),
            )
        } else if !tally.was_successful() {
            (
                &[StyleAttr::FgWhite, StyleAttr::BgRed],
                format!("FAILURES!\n{}", tally.counts_line()),
            )
        } else {
            (
                &[StyleAttr::FgBlack, StyleAttr::BgYellow],
                format!(
                    "OK, but incomplete, skipped, or risky tests!\n{}",
                    tally.counts_line()
                ),
            )
        };

        self.writer.write_new_line()?;
        self.writer.write_with_color(attrs, &text)?;
        self.writer.write_new_line()?;
        Ok(())
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

impl<W: LineWriter> TestOutcomeListener for ProgressReporter<W> {
    fn on_test_start(&mut self, test: &TestInfo) -> Result<()> {
        if self.debug {
            debug!(test = %test.describe(), "test started");
        }

        self.writer
            .write(&format!("\nStarting test '{}'.\n", test.describe()))?;
        self.last_test_name = test.name.clone();
        Ok(())
    }

    fn on_test_end(&mut self, test: &TestInfo, elapsed: Duration) -> Result<()> {
        if self.debug {
            debug!(test = %test.describe(), elapsed_ms = elapsed.as_millis() as u64, "test ended");
        }

        if !self.last_test_failed {
            self.write_token(Outcome::Pass)?;
        }

        self.tally.tests += 1;
        self.tally.assertions += test.assertion_count();

        self.last_test_failed = false;
        self.last_test_name.clear();

        if let Some(output) = test.echoed_output() {
            self.writer.write_new_line()?;
            self.writer.write(output)?;
        }
        self.writer.write_new_line()?;
        Ok(())
    }

    fn on_error(&mut self, test: &TestInfo, fault: &Fault, _elapsed: Duration) -> Result<()> {
        self.report_fault(Outcome::Error, test, fault)
    }

    fn on_failure(&mut self, test: &TestInfo, fault: &Fault, _elapsed: Duration) -> Result<()> {
        self.report_fault(Outcome::Fail, test, fault)
    }

    fn on_warning(&mut self, test: &TestInfo, fault: &Fault, _elapsed: Duration) -> Result<()> {
        self.report_fault(Outcome::Warning, test, fault)
    }

    fn on_incomplete(
        &mut self,
        test: &TestInfo,
        fault: &Fault,
        _elapsed: Duration,
    ) -> Result<()> {
        self.report_fault(Outcome::Incomplete, test, fault)
    }

    fn on_risky(&mut self, test: &TestInfo, fault: &Fault, _elapsed: Duration) -> Result<()> {
        self.report_fault(Outcome::Risky, test, fault)
    }

    fn on_skipped(&mut self, test: &TestInfo, fault: &Fault, _elapsed: Duration) -> Result<()> {
        // A test with an unmet dependency is skipped without ever being started.
        if test.name != self.last_test_name {
            if self.debug {
                debug!(test = %test.describe(), "skipped before start");
            }

            self.writer.write_new_line()?;
            let header = format!("{}: {}", Outcome::Skipping.label(), test.describe());
            self.writer
                .write_with_color(Outcome::Skipping.style(), &header)?;
            self.writer.write_new_line()?;
            self.writer.write(&fault.message)?;
            self.writer.write_new_line()?;

            self.tally.record(Outcome::Skipping);
            self.tally.tests += 1;
            return Ok(());
        }

        if self.debug {
            debug!(test = %test.describe(), "skipped");
        }
        self.write_token(Outcome::Skipped)
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.write_footer()?;
        self.writer.flush()?;
        Ok(())
    }
}
