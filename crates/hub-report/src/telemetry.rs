//! Process-start telemetry: one "Hub import" entry per process.

use once_cell::sync::OnceCell;

use crate::entry::DiagnosticEntry;
use crate::reporter::Reporter;

/// Host details included in the start-up entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: String,
    pub os_release: String,
    pub machine: String,
    pub processor: String,
    pub runtime: String,
    pub version: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            os_release: os_release().unwrap_or_else(|| "unknown".to_string()),
            machine: std::env::consts::ARCH.to_string(),
            processor: processor().unwrap_or_else(|| std::env::consts::ARCH.to_string()),
            runtime: format!("rust-{}", env!("CARGO_PKG_RUST_VERSION")),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Markdown body of the start-up entry.
    pub fn content(&self) -> String {
        format!(
            "## System information\n\
             OS: `{}` (release: {})\n\
             Processor: `{}, {}`\n\
             Runtime: `{}`\n\
             Library: `{}`\n",
            self.os, self.os_release, self.machine, self.processor, self.runtime, self.version
        )
    }
}

#[cfg(target_os = "linux")]
fn os_release() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn os_release() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn processor() -> Option<String> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    cpuinfo
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split_once(':'))
        .map(|(_, v)| v.trim().to_string())
}

#[cfg(not(target_os = "linux"))]
fn processor() -> Option<String> {
    None
}

/// Sends the start-up entry at most once per value.
#[derive(Debug)]
pub struct StartupTelemetry {
    sent: OnceCell<bool>,
}

impl StartupTelemetry {
    pub const fn new() -> Self {
        Self {
            sent: OnceCell::new(),
        }
    }

    /// Send the entry on the first call; later calls are no-ops.
    ///
    /// Returns whether the first attempt was accepted by the sink.
    pub fn initialize(&self, reporter: &Reporter, info: impl FnOnce() -> SystemInfo) -> bool {
        *self
            .sent
            .get_or_init(|| reporter.submit(&DiagnosticEntry::import(&info())))
    }

    pub fn is_initialized(&self) -> bool {
        self.sent.get().is_some()
    }
}

impl Default for StartupTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

static STARTUP: StartupTelemetry = StartupTelemetry::new();

/// Process-wide start-up ping. Idempotent, never fails.
pub fn initialize_telemetry(reporter: &Reporter) -> bool {
    STARTUP.initialize(reporter, SystemInfo::collect)
}
