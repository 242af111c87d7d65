// Tests for replaying JSON-lines event streams

use std::io::Cursor;

use progress_reporter::cli::Cli;
use progress_reporter::commands::run::build_writer;
use progress_reporter::config::ReporterSettings;
use progress_reporter::events::{TestEvent, replay};
use progress_reporter::report::{ConsoleWriter, EchoCollector, ProgressReporter};

fn plain_reporter() -> (ProgressReporter, EchoCollector) {
    let sink = EchoCollector::new();
    let writer = ConsoleWriter::new(Box::new(sink.clone()));
    (ProgressReporter::new(writer), sink)
}

const STREAM: &str = r#"
{"event":"suite_start","count":3}
{"event":"test_start","test":{"name":"testA","class":"DemoTest"}}
{"event":"test_end","test":{"name":"testA","class":"DemoTest","assertions":2},"elapsed":0.01}
{"event":"test_start","test":{"name":"testB","class":"DemoTest"}}
{"event":"test_failure","test":{"name":"testB","class":"DemoTest"},"fault":{"message":"Failed asserting that 1 is 2."}}
{"event":"test_end","test":{"name":"testB","class":"DemoTest","assertions":1}}
{"event":"test_skipped","test":{"name":"testC","class":"DemoTest"},"fault":{"message":"depends on testB"}}
{"event":"suite_end"}
"#;

#[test]
fn test_replay_stream() {
    // Arrange
    let (mut reporter, sink) = plain_reporter();

    // Act
    let summary = replay(Cursor::new(STREAM), &mut reporter).expect("replay failed");

    // Assert
    assert_eq!(summary.events, 8);
    assert!(summary.saw_suite_end);
    assert_eq!(reporter.num_assertions(), 3);

    let expected = "\nStarting test 'DemoTest::testA'.\nPASS\n\
                    \nStarting test 'DemoTest::testB'.\nFAIL\n\
                    \nSKIPPING: DemoTest::testC\ndepends on testB\n\
                    \nFAILURES!\nTests: 3, Assertions: 3, Failures: 1, Skipped: 1.\n";
    assert_eq!(sink.contents(), expected);
}

#[test]
fn test_replay_without_suite_end_still_prints_footer() {
    // Arrange
    let (mut reporter, sink) = plain_reporter();
    let stream = r#"{"event":"test_start","test":{"name":"only"}}
{"event":"test_end","test":{"name":"only"}}"#;

    // Act
    let summary = replay(Cursor::new(stream), &mut reporter).unwrap();

    // Assert
    assert!(!summary.saw_suite_end);
    assert!(sink.contents().ends_with("\nOK (1 test, 1 assertion)\n"));
}

#[test]
fn test_replay_ignores_events_after_suite_end() {
    // Arrange
    let (mut reporter, sink) = plain_reporter();
    let stream = "{\"event\":\"suite_end\"}\n{\"event\":\"test_start\",\"test\":{\"name\":\"late\"}}\n";

    // Act
    let summary = replay(Cursor::new(stream), &mut reporter).unwrap();

    // Assert
    assert_eq!(summary.events, 1);
    assert!(!sink.contents().contains("late"));
}

#[test]
fn test_replay_reports_bad_line_number() {
    // Arrange
    let (mut reporter, _sink) = plain_reporter();
    let stream = "{\"event\":\"suite_start\"}\n\n{\"event\":\"test_start\"}\n";

    // Act
    let err = replay(Cursor::new(stream), &mut reporter).unwrap_err();

    // Assert
    assert!(err.to_string().contains("line 3"), "{}", err);
}

#[test]
fn test_event_serialization_tag() {
    let json = serde_json::to_string(&TestEvent::SuiteEnd).unwrap();
    assert_eq!(json, r#"{"event":"suite_end"}"#);
}

#[test]
fn test_ci_echo_collects_written_output() {
    // Arrange
    let cli = Cli {
        ci_echo: true,
        no_color: true,
        ..Cli::default()
    };
    let settings = ReporterSettings::resolve_with(&cli, None, |_| None);
    let sink = EchoCollector::new();
    let echo = EchoCollector::new();
    let writer = build_writer(Box::new(sink.clone()), &settings, Some(&echo));
    let mut reporter = ProgressReporter::new(writer);
    let stream = r#"{"event":"test_start","test":{"name":"x"}}
{"event":"test_end","test":{"name":"x"}}
{"event":"suite_end"}"#;

    // Act
    replay(Cursor::new(stream), &mut reporter).unwrap();

    // Assert
    assert!(settings.ci_echo_enabled);
    assert!(!echo.is_empty());
    assert_eq!(echo.contents(), sink.contents());
}
