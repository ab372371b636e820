use std::collections::BTreeSet;

use hub_error::HubError;
use serde::Serialize;

use crate::telemetry::SystemInfo;

/// One unit sent to the diagnostics sink. Built, sent once, dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEntry {
    pub title: String,
    pub content: String,
    pub tags: BTreeSet<String>,
}

impl DiagnosticEntry {
    pub fn new<I, S>(title: impl Into<String>, content: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: content.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Entry for a taxonomy error: titled by kind, tagged `error` and `kind:<Name>`.
    pub fn from_error(error: &HubError) -> Self {
        let mut content = format!(
            "## Exception\n```\n{}: {}\n```\n\nCategory: `{}`\n",
            error.name(),
            error.message(),
            error.category()
        );
        if !error.params().is_empty() {
            content.push_str("\n## Parameters\n");
            for (key, value) in error.params().iter() {
                content.push_str(&format!("- `{key}`: {value}\n"));
            }
        }
        Self::new(
            error.name(),
            content,
            ["error".to_string(), format!("kind:{}", error.name())],
        )
    }

    /// Entry sent once at process start.
    pub fn import(info: &SystemInfo) -> Self {
        Self::new(
            "Hub import",
            info.content(),
            [
                "import".to_string(),
                format!("os:{}", info.os),
                format!("runtime:{}", info.runtime),
            ],
        )
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// JSON body accepted by the entries endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct EntryBody<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub tags: Vec<&'a str>,
    pub context_type: &'static str,
}

impl<'a> From<&'a DiagnosticEntry> for EntryBody<'a> {
    fn from(entry: &'a DiagnosticEntry) -> Self {
        Self {
            title: &entry.title,
            content: &entry.content,
            tags: entry.tags.iter().map(String::as_str).collect(),
            context_type: "hub",
        }
    }
}
