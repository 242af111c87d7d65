// Run tallies used by the footer

use crate::state::Outcome;
use serde::Serialize;

/// Outcome counts accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub tests: u64,
    pub assertions: u64,
    pub errors: u64,
    pub failures: u64,
    pub warnings: u64,
    pub skipped: u64,
    pub incomplete: u64,
    pub risky: u64,
}

impl RunTally {
    /// Record an outcome token
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => {}
            Outcome::Fail => self.failures += 1,
            Outcome::Error => self.errors += 1,
            Outcome::Warning => self.warnings += 1,
            Outcome::Incomplete => self.incomplete += 1,
            Outcome::Risky => self.risky += 1,
            Outcome::Skipped | Outcome::Skipping => self.skipped += 1,
        }
    }

    /// Any errors, failures or warnings
    pub fn was_successful(&self) -> bool {
        self.errors == 0 && self.failures == 0 && self.warnings == 0
    }

    /// Successful, but something was skipped, incomplete or risky
    pub fn has_notices(&self) -> bool {
        self.skipped > 0 || self.incomplete > 0 || self.risky > 0
    }

    /// `Tests: N, Assertions: M, ...` line, listing only non-zero counts
    pub fn counts_line(&self) -> String {
        let mut line = format!("Tests: {}, Assertions: {}", self.tests, self.assertions);
        let extras = [
            ("Errors", self.errors),
            ("Failures", self.failures),
            ("Warnings", self.warnings),
            ("Skipped", self.skipped),
            ("Incomplete", self.incomplete),
            ("Risky", self.risky),
        ];
        for (label, count) in extras {
            if count > 0 {
                line.push_str(&format!(", {}: {}", label, count));
            }
        }
        line.push('.');
        line
    }
}
