use hub_error::HubError;
use tracing::{debug, warn};

use crate::config::ReporterConfig;
use crate::entry::DiagnosticEntry;
use crate::sink::{DiagnosticSink, HttpSink};

struct Credentials {
    access_token: String,
    journal_id: String,
}

/// Best-effort client for the diagnostics sink.
///
/// Nothing here returns an error to the caller: failed submissions are logged
/// with `tracing::warn!` and dropped. No retries, no queue.
pub struct Reporter {
    sink: Option<Box<dyn DiagnosticSink>>,
    credentials: Option<Credentials>,
}

impl Reporter {
    /// A reporter that never sends anything.
    pub fn disabled() -> Self {
        Self {
            sink: None,
            credentials: None,
        }
    }

    /// Build from configuration. Disabled when reporting is not opted in,
    /// credentials are missing, or the http client cannot be built.
    pub fn from_config(config: &ReporterConfig) -> Self {
        let Some((access_token, journal_id)) = config.credentials() else {
            debug!(enabled = config.enabled, "diagnostics reporting disabled");
            return Self::disabled();
        };
        match HttpSink::new(config) {
            Ok(sink) => Self::with_sink(sink, access_token, journal_id),
            Err(e) => {
                warn!(error = %e, "diagnostics reporting disabled: could not build client");
                Self::disabled()
            }
        }
    }

    pub fn with_sink(
        sink: impl DiagnosticSink + 'static,
        access_token: impl Into<String>,
        journal_id: impl Into<String>,
    ) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            credentials: Some(Credentials {
                access_token: access_token.into(),
                journal_id: journal_id.into(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some() && self.credentials.is_some()
    }

    /// Send one entry with explicit credentials. Never fails.
    pub fn report<I, S>(
        &self,
        access_token: &str,
        journal_id: &str,
        title: &str,
        content: &str,
        tags: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = DiagnosticEntry::new(title, content, tags);
        self.send(access_token, journal_id, &entry);
    }

    /// Send one entry with the configured credentials. Returns whether the sink accepted it.
    pub fn submit(&self, entry: &DiagnosticEntry) -> bool {
        match &self.credentials {
            Some(c) => self.send(&c.access_token, &c.journal_id, entry),
            None => {
                debug!(title = %entry.title, "diagnostics reporting disabled; entry dropped");
                false
            }
        }
    }

    /// Report a taxonomy error once. Silent kinds and already reported errors are skipped.
    pub fn report_error(&self, error: &HubError) -> bool {
        if !error.is_reportable() || !error.mark_reported() {
            return false;
        }
        self.submit(&DiagnosticEntry::from_error(error))
    }

    fn send(&self, access_token: &str, journal_id: &str, entry: &DiagnosticEntry) -> bool {
        let Some(sink) = &self.sink else {
            debug!(title = %entry.title, "no diagnostics sink; entry dropped");
            return false;
        };
        match sink.submit(access_token, journal_id, entry) {
            Ok(()) => {
                debug!(title = %entry.title, "diagnostic entry sent");
                true
            }
            Err(e) => {
                warn!(title = %entry.title, error = %e, "failed to send diagnostic entry");
                false
            }
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
