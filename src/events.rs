// Lifecycle event stream - JSON lines replayed into a listener

use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::report::TestOutcomeListener;
use crate::state::{Fault, TestInfo};

/// One line of the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TestEvent {
    SuiteStart {
        #[serde(default)]
        count: Option<usize>,
    },
    TestStart {
        test: TestInfo,
    },
    TestEnd {
        test: TestInfo,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestError {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestFailure {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestWarning {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestIncomplete {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestRisky {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    TestSkipped {
        test: TestInfo,
        fault: Fault,
        #[serde(default)]
        elapsed: Option<f64>,
    },
    SuiteEnd,
}

/// Seconds as a duration; negative or non-finite values become zero
pub fn elapsed_duration(seconds: Option<f64>) -> Duration {
    seconds
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .unwrap_or_default()
}

/// Parse a single event line
pub fn parse_event(line: &str) -> serde_json::Result<TestEvent> {
    serde_json::from_str(line)
}

/// Forward one event to the listener
pub fn dispatch<L>(listener: &mut L, event: &TestEvent) -> crate::report::Result<()>
where
    L: TestOutcomeListener + ?Sized,
{
    match event {
        TestEvent::SuiteStart { count } => {
            if let Some(count) = count {
                info!("Suite started with {} test(s)", count);
            }
            Ok(())
        }
        TestEvent::TestStart { test } => listener.on_test_start(test),
        TestEvent::TestEnd { test, elapsed } => {
            listener.on_test_end(test, elapsed_duration(*elapsed))
        }
        TestEvent::TestError {
            test,
            fault,
            elapsed,
        } => listener.on_error(test, fault, elapsed_duration(*elapsed)),
        TestEvent::TestFailure {
            test,
            fault,
            elapsed,
        } => listener.on_failure(test, fault, elapsed_duration(*elapsed)),
        TestEvent::TestWarning {
            test,
            fault,
            elapsed,
        } => listener.on_warning(test, fault, elapsed_duration(*elapsed)),
        TestEvent::TestIncomplete {
            test,
            fault,
            elapsed,
        } => listener.on_incomplete(test, fault, elapsed_duration(*elapsed)),
        TestEvent::TestRisky {
            test,
            fault,
            elapsed,
        } => listener.on_risky(test, fault, elapsed_duration(*elapsed)),
        TestEvent::TestSkipped {
            test,
            fault,
            elapsed,
        } => listener.on_skipped(test, fault, elapsed_duration(*elapsed)),
        TestEvent::SuiteEnd => listener.on_run_end(),
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub saw_suite_end: bool,
}

/// Replay a JSON-lines event stream into `listener`.
///
/// `on_run_end` is called exactly once, even when the stream has no
/// `suite_end` event. Events after `suite_end` are ignored.
pub fn replay<R, L>(reader: R, listener: &mut L) -> Result<ReplaySummary>
where
    R: BufRead,
    L: TestOutcomeListener + ?Sized,
{
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read event stream at line {}", line_no))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = parse_event(line)
            .with_context(|| format!("Invalid event on line {}", line_no))?;

        if summary.saw_suite_end {
            warn!("Ignoring event on line {} after suite_end", line_no);
            continue;
        }

        debug!("Dispatching event from line {}", line_no);
        dispatch(&mut *listener, &event)
            .with_context(|| format!("Failed to report event on line {}", line_no))?;

        summary.events += 1;
        if event == TestEvent::SuiteEnd {
            summary.saw_suite_end = true;
        }
    }

    if !summary.saw_suite_end {
        listener
            .on_run_end()
            .context("Failed to finish report")?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_test_start() {
        let event =
            parse_event(r#"{"event":"test_start","test":{"name":"a","class":"T"}}"#).unwrap();
        assert_eq!(
            event,
            TestEvent::TestStart {
                test: TestInfo::new("a").with_class("T")
            }
        );
    }

    #[test]
    fn test_parse_failure_with_fault() {
        let event = parse_event(
            r#"{"event":"test_failure","test":{"name":"b"},"fault":{"message":"m","description":"d"},"elapsed":0.5}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            TestEvent::TestFailure {
                test: TestInfo::new("b"),
                fault: Fault::new("m").with_description("d"),
                elapsed: Some(0.5),
            }
        );
    }

    #[test]
    fn test_parse_suite_end() {
        assert_eq!(
            parse_event(r#"{"event":"suite_end"}"#).unwrap(),
            TestEvent::SuiteEnd
        );
    }

    #[test]
    fn test_parse_unknown_event() {
        assert!(parse_event(r#"{"event":"test_exploded"}"#).is_err());
        assert!(parse_event("not json").is_err());
    }

    #[test]
    fn test_elapsed_duration() {
        assert_eq!(elapsed_duration(None), Duration::ZERO);
        assert_eq!(elapsed_duration(Some(-1.0)), Duration::ZERO);
        assert_eq!(elapsed_duration(Some(f64::NAN)), Duration::ZERO);
        assert_eq!(elapsed_duration(Some(1.5)), Duration::from_millis(1500));
    }
}
