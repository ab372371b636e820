use super::{ErrorPolicy, Result};

/// Extension trait for `Result` enabling policy-driven reporting without
/// contaminating core control-flow with side-effects.
///
/// Typical usage: at a library or CLI boundary, call `report_err` to send the
/// error through your chosen [`ErrorPolicy`] while preserving the original
/// result for further handling.
///
/// Example
/// ```rust,ignore
/// use hub_error::{HubError, Result, ResultExt, ErrorPolicy};
///
/// fn open(policy: &impl ErrorPolicy) -> Result<()> {
///     let r: Result<()> = Err(HubError::dataset_not_found("user/mnist"));
///     r.report_err(policy) // Reported according to policy, still Err for caller to handle
/// }
/// ```
pub trait ResultExt<T> {
    /// If the result is an error, report it through the policy and return the result unchanged
    fn report_err<P: ErrorPolicy + ?Sized>(self, policy: &P) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn report_err<P: ErrorPolicy + ?Sized>(self, policy: &P) -> Self {
        if let Err(ref e) = self {
            policy.report(e);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HubError, NoopPolicy};

    #[test]
    fn report_err_marks_and_preserves_error() {
        let r: Result<u8> = Err(HubError::permission_denied("s3://bucket/ds"));
        let r = r.report_err(&NoopPolicy);
        let err = r.unwrap_err();
        assert!(err.was_reported());
        assert_eq!(err.message(), "No permission to store the dataset at s3://bucket/ds");
    }

    #[test]
    fn report_err_leaves_ok_untouched() {
        let r: Result<u8> = Ok(7);
        assert_eq!(r.report_err(&NoopPolicy).unwrap(), 7);
    }
}
