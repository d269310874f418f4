//! Unit tests for the Engine logging hub
//!
//! IMPORTANT: the logger and severity filter are process-wide.
//! All tests are marked with #[serial] to run sequentially.

use crate::galaxy3d::Engine;
use crate::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
///
/// Only entries from "galaxy3d::test" are kept: non-serial tests in this
/// crate log concurrently through the same global logger.
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "galaxy3d::test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn teardown() {
    Engine::reset_logger();
    Engine::set_min_severity(LogSeverity::Info);
}

// ============================================================================
// LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_log_reaches_custom_logger() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Warn, "galaxy3d::test", "hello".to_string());

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Warn);
    assert_eq!(entries[0].source, "galaxy3d::test");
    assert_eq!(entries[0].message, "hello");
    assert!(entries[0].file.is_none());
    drop(entries);
    teardown();
}

#[test]
#[serial]
fn test_log_detailed_carries_location() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log_detailed(LogSeverity::Error, "galaxy3d::test", "boom".to_string(), "x.rs", 7);

    let entries = entries.lock().unwrap();
    assert_eq!(entries[0].file, Some("x.rs"));
    assert_eq!(entries[0].line, Some(7));
    drop(entries);
    teardown();
}

#[test]
#[serial]
fn test_error_macro_records_file_and_line() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    crate::engine_error!("galaxy3d::test", "code {}", 3);

    let entries = entries.lock().unwrap();
    assert_eq!(entries[0].message, "code 3");
    assert!(entries[0].file.unwrap().ends_with("engine_tests.rs"));
    assert!(entries[0].line.is_some());
    drop(entries);
    teardown();
}

#[test]
#[serial]
fn test_engine_err_builds_backend_error_and_logs() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let err = crate::engine_err!("galaxy3d::test", "bad handle {}", 9);
    assert_eq!(err, crate::galaxy3d::Error::BackendError("bad handle 9".to_string()));
    assert_eq!(entries.lock().unwrap().len(), 1);
    teardown();
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    fn fails() -> crate::galaxy3d::Result<u32> {
        crate::engine_bail!("galaxy3d::test", "nope");
    }

    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    assert!(fails().is_err());
    assert_eq!(entries.lock().unwrap()[0].severity, LogSeverity::Error);
    teardown();
}

// ============================================================================
// SEVERITY FILTER TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_min_severity_drops_debug() {
    teardown();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Trace, "galaxy3d::test", "t".to_string());
    Engine::log(LogSeverity::Debug, "galaxy3d::test", "d".to_string());
    Engine::log(LogSeverity::Info, "galaxy3d::test", "i".to_string());

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "i");
    drop(entries);
    teardown();
}

#[test]
#[serial]
fn test_min_severity_round_trips() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        Engine::set_min_severity(severity);
        assert_eq!(Engine::min_severity(), severity);
    }
    teardown();
}

#[test]
#[serial]
fn test_is_enabled() {
    Engine::set_min_severity(LogSeverity::Warn);
    assert!(!Engine::is_enabled(LogSeverity::Info));
    assert!(Engine::is_enabled(LogSeverity::Warn));
    assert!(Engine::is_enabled(LogSeverity::Error));
    teardown();
}
