// State module - Test descriptors and run tallies

pub mod metrics;
pub mod result;

pub use metrics::RunTally;
pub use result::{Fault, TestInfo};

use crate::report::style::StyleAttr;
use serde::Serialize;

/// Outcome token printed after (or instead of) a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Pass,
    Fail,
    Error,
    Warning,
    Incomplete,
    Risky,
    Skipped,
    Skipping,
}

impl Outcome {
    /// Label written to the output
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Error => "ERROR",
            Outcome::Warning => "WARNING",
            Outcome::Incomplete => "INCOMPLETE",
            Outcome::Risky => "RISKY",
            Outcome::Skipped => "SKIPPED",
            Outcome::Skipping => "SKIPPING",
        }
    }

    /// Style attributes the token is rendered with
    pub fn style(&self) -> &'static [StyleAttr] {
        use StyleAttr::*;
        match self {
            Outcome::Pass => &[FgGreen, Bold],
            Outcome::Fail => &[BgRed, FgWhite],
            Outcome::Error | Outcome::Warning => &[FgRed, Bold],
            Outcome::Incomplete | Outcome::Risky => &[FgYellow, Bold],
            Outcome::Skipped | Outcome::Skipping => &[FgCyan, Bold],
        }
    }

    /// Whether this outcome suppresses the PASS token of the running test
    pub fn is_failure_class(&self) -> bool {
        !matches!(self, Outcome::Pass | Outcome::Skipping)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
