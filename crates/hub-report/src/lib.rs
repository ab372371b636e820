//! hub-report: best-effort diagnostics reporting for hub.
//!
//! Provides the [`Reporter`] (a blocking client for the journal entries
//! endpoint that never fails its caller), [`DiagnosticsPolicy`] to plug it into
//! `hub_error`'s reporting boundary, TOML/env configuration, and the one-time
//! process-start ping.
//!
//! Quick start:
//! ```no_run
//! use std::sync::Arc;
//! use hub_report::{DiagnosticsPolicy, Reporter, ReporterConfig, initialize_telemetry};
//! use hub_error::{ErrorPolicy, HubError};
//! # fn run() -> Result<(), hub_report::ConfigError> {
//! let cfg = ReporterConfig::load_default()?;
//! let reporter = Arc::new(Reporter::from_config(&cfg));
//! initialize_telemetry(&reporter);
//! let policy = DiagnosticsPolicy::new(reporter);
//! let err = policy.surface(HubError::dataset_not_found("user/mnist"));
//! eprintln!("{err}");
//! # Ok(()) }
//! ```
pub mod config;
pub mod entry;
pub mod error;
pub mod policy;
pub mod reporter;
pub mod sink;
pub mod telemetry;

pub use config::ReporterConfig;
pub use entry::DiagnosticEntry;
pub use error::{ConfigError, ReportError};
pub use policy::DiagnosticsPolicy;
pub use reporter::Reporter;
pub use sink::{DiagnosticSink, HttpSink, RecordingSink, Submission};
pub use telemetry::{StartupTelemetry, SystemInfo, initialize_telemetry};
