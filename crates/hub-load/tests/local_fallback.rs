// Without the legacy reader every load stops at `LegacyModuleNotInstalled`, so
// the fallback tests only build with `legacy-v0`.
#![cfg_attr(not(feature = "legacy-v0"), allow(dead_code, unused_imports))]

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use hub_error::ErrorKind;
use hub_load::{Format, local_dispatcher};
use hub_report::{DiagnosticsPolicy, RecordingSink, Reporter};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.text())
}

fn policy(sink: Arc<RecordingSink>) -> Arc<DiagnosticsPolicy> {
    Arc::new(DiagnosticsPolicy::new(Arc::new(Reporter::with_sink(
        sink, "tok", "jrn",
    ))))
}

fn write(root: &Path, rel: &str, file: &str, body: &str) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), body).unwrap();
}

#[cfg(feature = "legacy-v0")]
#[test]
fn current_dataset_is_loaded_after_legacy_failure() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "user/cifar", "dataset.json", r#"{"version": "1.0"}"#);
    let sink = Arc::new(RecordingSink::new());

    let loaded = local_dispatcher(root.path(), policy(sink.clone()))
        .dispatch("user/cifar")
        .unwrap();
    assert_eq!(loaded.format, Format::Current);
    assert_eq!(loaded.dataset.metadata["version"], "1.0");
    assert_eq!(sink.count(), 0, "fallback must not report");
}

#[cfg(feature = "legacy-v0")]
#[test]
fn unknown_dataset_fails_fast() {
    let root = tempfile::tempdir().unwrap();
    let sink = Arc::new(RecordingSink::new());

    let err = local_dispatcher(root.path(), policy(sink.clone()))
        .load("user/ghost")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetNotFound);
    assert_eq!(err.message(), "The dataset with tag user/ghost was not found");
}

#[cfg(feature = "legacy-v0")]
#[test]
fn legacy_dataset_is_served_with_deprecation() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "user/old", "meta.json", r#"{"tensors": {}}"#);
    let sink = Arc::new(RecordingSink::new());

    let (loaded, logs) = with_captured_logs(|| {
        local_dispatcher(root.path(), policy(sink.clone())).dispatch("user/old")
    });
    let loaded = loaded.unwrap();
    assert_eq!(loaded.format, Format::Legacy);
    assert!(loaded.deprecation.is_some());
    assert!(logs.contains("deprecated format v0.x"), "logs: {logs}");
    assert_eq!(sink.count(), 0);
}

#[cfg(feature = "legacy-v0")]
#[test]
fn corrupt_legacy_metadata_falls_back() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "user/mixed", "meta.json", "{not json");
    write(root.path(), "user/mixed", "dataset.json", "{}");
    let sink = Arc::new(RecordingSink::new());

    let (loaded, logs) = with_captured_logs(|| {
        local_dispatcher(root.path(), policy(sink.clone())).dispatch("user/mixed")
    });
    assert_eq!(loaded.unwrap().format, Format::Current);
    assert_eq!(sink.count(), 0);
    assert!(logs.contains("falling back to current format"), "logs: {logs}");
}

#[cfg(not(feature = "legacy-v0"))]
#[test]
fn missing_legacy_reader_is_reported_once() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "user/cifar", "dataset.json", "{}");
    let sink = Arc::new(RecordingSink::new());

    let err = local_dispatcher(root.path(), policy(sink.clone()))
        .load("user/cifar")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LegacyModuleNotInstalled);
    assert!(err.message().contains("legacy-v0"));
    let subs = sink.submissions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].entry.title, "LegacyModuleNotInstalled");
}
