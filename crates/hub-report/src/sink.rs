use std::sync::Mutex;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::ReporterConfig;
use crate::entry::{DiagnosticEntry, EntryBody};
use crate::error::ReportError;

const BODY_SNIPPET_LEN: usize = 256;

/// Destination for diagnostic entries.
pub trait DiagnosticSink: Send + Sync {
    fn submit(
        &self,
        access_token: &str,
        journal_id: &str,
        entry: &DiagnosticEntry,
    ) -> Result<(), ReportError>;
}

/// Posts entries to the journal entries endpoint over a blocking client.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    spire_url: String,
}

impl HttpSink {
    pub fn new(config: &ReporterConfig) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| ReportError::Client(e.to_string()))?;
        Ok(Self::with_client(client, &config.spire_url))
    }

    pub fn with_client(client: Client, spire_url: &str) -> Self {
        Self {
            client,
            spire_url: spire_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn entries_url(&self, journal_id: &str) -> String {
        format!("{}/journals/{}/entries", self.spire_url, journal_id)
    }
}

impl DiagnosticSink for HttpSink {
    fn submit(
        &self,
        access_token: &str,
        journal_id: &str,
        entry: &DiagnosticEntry,
    ) -> Result<(), ReportError> {
        let response = self
            .client
            .post(self.entries_url(journal_id))
            .bearer_auth(access_token)
            .json(&EntryBody::from(entry))
            .send()
            .map_err(|e| ReportError::from_reqwest(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ReportError::Authentication {
                status: status.as_u16(),
            });
        }
        let text = response.text().unwrap_or_default();
        Err(ReportError::Status {
            status: status.as_u16(),
            body_snippet: truncate(&text, BODY_SNIPPET_LEN),
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// A submitted entry, as seen by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub access_token: String,
    pub journal_id: String,
    pub entry: DiagnosticEntry,
}

/// In-memory sink that records every submission; can be told to fail each call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<Submission>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt and then returns `ReportError::Sink`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        match self.submissions.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.submissions().len()
    }
}

impl DiagnosticSink for RecordingSink {
    fn submit(
        &self,
        access_token: &str,
        journal_id: &str,
        entry: &DiagnosticEntry,
    ) -> Result<(), ReportError> {
        let submission = Submission {
            access_token: access_token.to_string(),
            journal_id: journal_id.to_string(),
            entry: entry.clone(),
        };
        match self.submissions.lock() {
            Ok(mut guard) => guard.push(submission),
            Err(poisoned) => poisoned.into_inner().push(submission),
        }
        match &self.fail_with {
            Some(reason) => Err(ReportError::Sink(reason.clone())),
            None => Ok(()),
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn submit(
        &self,
        access_token: &str,
        journal_id: &str,
        entry: &DiagnosticEntry,
    ) -> Result<(), ReportError> {
        (**self).submit(access_token, journal_id, entry)
    }
}
