use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use hub_error::{ErrorPolicy, HubError};
use hub_report::{
    DiagnosticEntry, DiagnosticSink, DiagnosticsPolicy, HttpSink, ReportError, Reporter,
    ReporterConfig,
};

fn config_for(server_url: &str, timeout_ms: u64) -> ReporterConfig {
    ReporterConfig {
        enabled: true,
        access_token: Some("tok".into()),
        journal_id: Some("j1".into()),
        spire_url: server_url.to_string(),
        timeout_ms,
        ..ReporterConfig::default()
    }
}

#[test]
fn posts_entry_with_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/journals/j1/entries")
            .header("authorization", "Bearer tok")
            .json_body_partial(r#"{"title": "DatasetNotFound", "context_type": "hub"}"#);
        then.status(200).body(r#"{"id": "entry-1"}"#);
    });

    let sink = HttpSink::new(&config_for(&server.base_url(), 2_000)).unwrap();
    let entry = DiagnosticEntry::from_error(&HubError::dataset_not_found("user/mnist"));
    sink.submit("tok", "j1", &entry).expect("accepted");
    mock.assert_hits(1);
}

#[test]
fn server_errors_become_status_errors() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/journals/j1/entries");
        then.status(503).body("maintenance");
    });

    let sink = HttpSink::new(&config_for(&server.base_url(), 2_000)).unwrap();
    let entry = DiagnosticEntry::new("t", "c", ["error"]);
    match sink.submit("tok", "j1", &entry) {
        Err(ReportError::Status {
            status,
            body_snippet,
        }) => {
            assert_eq!(status, 503);
            assert_eq!(body_snippet, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn rejected_token_is_an_authentication_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/journals/j1/entries");
        then.status(401);
    });

    let sink = HttpSink::new(&config_for(&server.base_url(), 2_000)).unwrap();
    let entry = DiagnosticEntry::new("t", "c", ["error"]);
    assert!(matches!(
        sink.submit("bad", "j1", &entry),
        Err(ReportError::Authentication { status: 401 })
    ));
}

#[test]
fn slow_sink_times_out() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/journals/j1/entries");
        then.status(200).delay(Duration::from_secs(3));
    });

    let sink = HttpSink::new(&config_for(&server.base_url(), 200)).unwrap();
    let entry = DiagnosticEntry::new("t", "c", ["error"]);
    match sink.submit("tok", "j1", &entry) {
        Err(ReportError::Request { is_timeout, .. }) => assert!(is_timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn unreachable_sink_never_fails_the_caller() {
    let reporter = Arc::new(Reporter::from_config(&config_for("http://127.0.0.1:1", 500)));
    assert!(reporter.is_enabled());
    let policy = DiagnosticsPolicy::new(reporter);

    let err = policy.surface(HubError::authorization("not json"));
    assert_eq!(err.message(), "You are not authorized to access this resource.");
    assert!(err.was_reported());
}

#[test]
fn reporter_sends_through_http_once_per_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/journals/j1/entries")
            .json_body_partial(r#"{"tags": ["error", "kind:Locked"]}"#);
        then.status(201);
    });

    let reporter = Arc::new(Reporter::from_config(&config_for(&server.base_url(), 2_000)));
    let policy = DiagnosticsPolicy::new(reporter);
    let err = policy.surface(HubError::with_detail(hub_error::ErrorKind::Locked, "busy").unwrap());
    policy.report(&err);
    policy.report(&err.clone());
    mock.assert_hits(1);
}
