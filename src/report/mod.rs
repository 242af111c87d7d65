// Report module - Progress reporting for test lifecycle events

pub mod progress;
pub mod style;
pub mod writer;

use std::time::Duration;

use crate::state::{Fault, TestInfo};
use thiserror::Error;

pub use progress::ProgressReporter;
pub use style::{StyleAttr, StyleError, format_with_color};
pub use writer::{ConsoleWriter, EchoCollector, LineWriter, TeeWriter, escape_html};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Receiver of test lifecycle notifications
///
/// The runner calls exactly one method at a time, in test order. `elapsed`
/// is informational only.
pub trait TestOutcomeListener {
    /// Called when a test starts
    fn on_test_start(&mut self, test: &TestInfo) -> Result<()>;

    /// Called when a test finishes, after any outcome callbacks
    fn on_test_end(&mut self, test: &TestInfo, elapsed: Duration) -> Result<()>;

    fn on_error(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration) -> Result<()>;

    fn on_failure(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration) -> Result<()>;

    fn on_warning(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration) -> Result<()>;

    fn on_incomplete(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration)
    -> Result<()>;

    fn on_risky(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration) -> Result<()>;

    /// Called for skipped tests, including ones that never started
    fn on_skipped(&mut self, test: &TestInfo, fault: &Fault, elapsed: Duration) -> Result<()>;

    /// Called once when the whole run finishes
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
