use hub_error::HubError;

use crate::strategy::LegacyFailure;

/// Result of the legacy load attempt, as a state the dispatcher can branch on.
#[derive(Debug)]
pub enum LoadOutcome<D> {
    Success(D),
    /// The legacy reader is unavailable; terminal.
    FormatAbsent { module: String },
    /// The identifier does not exist; terminal, propagated unchanged.
    NotFound(HubError),
    /// Any other failure, wrapped as a silent probe error; triggers fallback.
    OtherFailure(HubError),
}

impl<D> LoadOutcome<D> {
    pub fn classify(result: Result<D, LegacyFailure>) -> Self {
        match result {
            Ok(dataset) => LoadOutcome::Success(dataset),
            Err(LegacyFailure::ModuleUnavailable { module }) => {
                LoadOutcome::FormatAbsent { module }
            }
            Err(LegacyFailure::NotFound(err)) => LoadOutcome::NotFound(err),
            Err(LegacyFailure::Other(source)) => {
                LoadOutcome::OtherFailure(HubError::legacy_probe(source))
            }
        }
    }

    /// Whether the dispatcher stops here instead of trying the current format.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadOutcome::OtherFailure(_))
    }
}
