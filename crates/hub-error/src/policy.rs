//! A policy for classifying and reporting errors at a boundary.
//!
//! Constructing a [`HubError`] is pure. Reporting is an explicit step taken where
//! the error is about to be surfaced, through an installed `ErrorPolicy`:
//! - tracing logs
//! - a diagnostics sink (see `hub-report`)
//! - terminal rendering
//!
//! [`ErrorPolicy::report`] enforces the taxonomy rules: silent kinds are never
//! emitted, and each error instance is emitted at most once.
//!
//! Example
//! ```rust,ignore
//! use hub_error::{ErrorPolicy, HubError, Visibility};
//!
//! struct PrintPolicy;
//! impl ErrorPolicy for PrintPolicy {
//!     fn classify(&self, e: &HubError) -> Visibility { e.visibility() }
//!     fn emit(&self, e: &HubError) { eprintln!("[{}] {e}", e.name()); }
//! }
//! ```

use super::{ConstructionError, ErrorKind, HubError, Params, Visibility};

pub trait ErrorPolicy: Send + Sync {
    /// Decide whether the error may be emitted
    fn classify(&self, error: &HubError) -> Visibility;

    /// Emit the error (log, send to a diagnostics sink, print, ...). Must not panic or fail.
    fn emit(&self, error: &HubError);

    /// Emit `error` if it is reportable and has not been reported yet.
    ///
    /// Returns whether this call emitted it.
    fn report(&self, error: &HubError) -> bool {
        if !self.classify(error).is_reportable() {
            return false;
        }
        if !error.mark_reported() {
            return false;
        }
        self.emit(error);
        true
    }

    /// Construct an error and report it in one step.
    fn raise(&self, kind: ErrorKind, params: Params) -> Result<HubError, ConstructionError> {
        let error = HubError::new(kind, params)?;
        self.report(&error);
        Ok(error)
    }

    /// Report an already constructed error and hand it back for propagation.
    fn surface(&self, error: HubError) -> HubError {
        self.report(&error);
        error
    }
}

/// A no-operation policy that does nothing
#[derive(Debug, Clone, Default)]
pub struct NoopPolicy;

impl ErrorPolicy for NoopPolicy {
    fn classify(&self, error: &HubError) -> Visibility {
        error.visibility()
    }

    fn emit(&self, _error: &HubError) {
        // Intentionally do nothing
    }
}

/// A policy that uses the error's own visibility and emits via tracing.
///
/// Events are leveled by category. A `quiet` policy logs everything at DEBUG,
/// for callers that already show the error to the user.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Default)]
pub struct TracingPolicy {
    quiet: bool,
}

#[cfg(feature = "tracing")]
impl TracingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[cfg(feature = "tracing")]
impl ErrorPolicy for TracingPolicy {
    fn classify(&self, error: &HubError) -> Visibility {
        error.visibility()
    }

    fn emit(&self, error: &HubError) {
        use crate::Category;
        use tracing::{Level, event};

        if self.quiet {
            let category = error.category();
            event!(Level::DEBUG, kind = error.name(), %category, error = %error);
            return;
        }
        match error.category() {
            Category::Internal => event!(Level::DEBUG, kind = error.name(), error = %error),
            Category::UserInput => event!(Level::WARN, kind = error.name(), error = %error),
            Category::RemoteService | Category::Environment => {
                let category = error.category();
                event!(Level::ERROR, kind = error.name(), %category, error = %error)
            }
        }
    }
}

/// Renders errors as a miette report on stderr.
#[cfg(feature = "diagnostic")]
#[derive(Debug, Clone, Default)]
pub struct MiettePolicy;

#[cfg(feature = "diagnostic")]
impl MiettePolicy {
    /// Print `error` unconditionally, whether or not it was reported.
    pub fn render(&self, error: &HubError) {
        let report = miette::Report::new(error.clone());
        eprintln!("{report:?}");
    }
}

#[cfg(feature = "diagnostic")]
impl ErrorPolicy for MiettePolicy {
    fn classify(&self, error: &HubError) -> Visibility {
        error.visibility()
    }

    fn emit(&self, error: &HubError) {
        self.render(error);
    }
}

/// A composite policy that delegates to multiple policies.
///
/// Behavior
/// - classify: `Reportable` if any inner policy says so (the error's own visibility when empty).
/// - emit: delegates emission to all inner policies in insertion order.
/// - report: the exactly-once check happens here, once, not per inner policy.
///
/// Example
/// ```rust,ignore
/// use hub_error::policy::{CombinedPolicy, NoopPolicy};
/// let policy = CombinedPolicy::new()
///     .push(NoopPolicy::default());
/// // with the `tracing` feature:
/// // let policy = policy.push(hub_error::policy::TracingPolicy::quiet());
/// ```
#[derive(Default)]
pub struct CombinedPolicy {
    policies: Vec<Box<dyn ErrorPolicy>>,
}

impl CombinedPolicy {
    /// Create an empty CombinedPolicy.
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// Add a policy by value (boxed internally), builder-style.
    pub fn push<P: ErrorPolicy + 'static>(mut self, policy: P) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl ErrorPolicy for CombinedPolicy {
    fn classify(&self, error: &HubError) -> Visibility {
        if self.policies.is_empty() {
            return error.visibility();
        }
        if self
            .policies
            .iter()
            .any(|p| p.classify(error).is_reportable())
        {
            Visibility::Reportable
        } else {
            Visibility::Silent
        }
    }

    fn emit(&self, error: &HubError) {
        for p in &self.policies {
            if p.classify(error).is_reportable() {
                p.emit(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingPolicy {
        emitted: Arc<AtomicUsize>,
    }

    impl ErrorPolicy for CountingPolicy {
        fn classify(&self, error: &HubError) -> Visibility {
            error.visibility()
        }

        fn emit(&self, _error: &HubError) {
            self.emitted.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn raise_reports_exactly_once() {
        let policy = CountingPolicy::default();
        let err = policy
            .raise(ErrorKind::NoneValue, Params::new().with("param", "schema"))
            .unwrap();
        assert_eq!(policy.emitted.load(Ordering::SeqCst), 1);

        // re-raising the same error (or a clone) does not report again
        assert!(!policy.report(&err));
        assert!(!policy.report(&err.clone()));
        assert_eq!(policy.emitted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn silent_errors_are_never_emitted() {
        let policy = CountingPolicy::default();
        let err = policy.surface(HubError::legacy_probe("bad header"));
        assert_eq!(policy.emitted.load(Ordering::SeqCst), 0);
        assert!(!err.was_reported());
    }

    #[test]
    fn raise_with_missing_params_does_not_report() {
        let policy = CountingPolicy::default();
        let res = policy.raise(ErrorKind::PermissionDenied, Params::new());
        assert!(res.is_err());
        assert_eq!(policy.emitted.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn combined_policy_emits_to_each_inner_policy_once() {
        let a = CountingPolicy::default();
        let b = CountingPolicy::default();
        let combined = CombinedPolicy::new()
            .push(a.clone())
            .push(b.clone())
            .push(NoopPolicy);
        assert_eq!(combined.len(), 3);

        let err = combined.surface(HubError::wrong_username("alice"));
        combined.report(&err);
        assert_eq!(a.emitted.load(Ordering::SeqCst), 1);
        assert_eq!(b.emitted.load(Ordering::SeqCst), 1);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn quiet_tracing_policy_still_marks_errors_reported() {
        let policy = CombinedPolicy::new().push(TracingPolicy::quiet());
        let err = policy.surface(HubError::info_not_found("no dataset.json"));
        assert!(err.was_reported());
        assert!(!policy.report(&err));
    }

    #[test]
    fn empty_combined_policy_uses_error_visibility() {
        let combined = CombinedPolicy::new();
        assert!(combined.is_empty());
        assert_eq!(
            combined.classify(&HubError::legacy_probe("x")),
            Visibility::Silent
        );
        assert_eq!(
            combined.classify(&HubError::dataset_not_found("x")),
            Visibility::Reportable
        );
    }
}
