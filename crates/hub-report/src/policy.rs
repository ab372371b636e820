use std::sync::Arc;

use hub_error::{ErrorPolicy, HubError, Visibility};

use crate::entry::DiagnosticEntry;
use crate::reporter::Reporter;

/// Routes reportable errors to the diagnostics sink.
///
/// The once-per-instance check is done by [`ErrorPolicy::report`]; `emit` only
/// builds the entry and hands it to the [`Reporter`], which swallows failures.
#[derive(Debug, Clone)]
pub struct DiagnosticsPolicy {
    reporter: Arc<Reporter>,
}

impl DiagnosticsPolicy {
    pub fn new(reporter: Arc<Reporter>) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }
}

impl ErrorPolicy for DiagnosticsPolicy {
    fn classify(&self, error: &HubError) -> Visibility {
        error.visibility()
    }

    fn emit(&self, error: &HubError) {
        self.reporter.submit(&DiagnosticEntry::from_error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use hub_error::{ErrorKind, Params};

    fn policy_with(sink: Arc<RecordingSink>) -> DiagnosticsPolicy {
        DiagnosticsPolicy::new(Arc::new(Reporter::with_sink(sink, "tok", "jrn")))
    }

    #[test]
    fn raise_sends_one_entry_with_error_tags() {
        let sink = Arc::new(RecordingSink::new());
        let policy = policy_with(sink.clone());
        let err = policy
            .raise(
                ErrorKind::ValueShape,
                Params::new().with("expected", "(2, 2)").with("actual", "(3,)"),
            )
            .unwrap();

        let subs = sink.submissions();
        assert_eq!(subs.len(), 1);
        let entry = &subs[0].entry;
        assert_eq!(entry.title, "ValueShape");
        assert!(entry.has_tag("error"));
        assert!(entry.has_tag("kind:ValueShape"));
        assert!(entry.content.contains(err.message()));
    }

    #[test]
    fn failing_sink_never_breaks_raise() {
        let sink = Arc::new(RecordingSink::failing("connection refused"));
        let policy = policy_with(sink.clone());
        let err = policy
            .raise(ErrorKind::Server, Params::new())
            .expect("construction succeeds even when the sink fails");
        assert_eq!(err.message(), "Internal server error.");
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn silent_kind_is_not_sent() {
        let sink = Arc::new(RecordingSink::new());
        let policy = policy_with(sink.clone());
        policy.surface(HubError::legacy_probe("truncated meta.json"));
        assert_eq!(sink.count(), 0);
    }
}
