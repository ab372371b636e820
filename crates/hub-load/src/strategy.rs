use hub_error::HubError;
use thiserror::Error;

/// Why the legacy strategy could not produce a dataset.
#[derive(Debug, Error)]
pub enum LegacyFailure {
    /// The optional legacy reader is not available in this build or environment.
    #[error("legacy format module '{module}' is unavailable")]
    ModuleUnavailable { module: String },

    /// The identifier does not resolve to any dataset.
    #[error(transparent)]
    NotFound(HubError),

    /// Anything else: wrong format, unreadable metadata, I/O trouble.
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LegacyFailure {
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LegacyFailure::Other(err.into())
    }
}

/// Loader for the deprecated dataset format.
pub trait LegacyLoader {
    type Dataset;

    fn load_legacy(&self, identifier: &str) -> Result<Self::Dataset, LegacyFailure>;
}

/// Loader for the current dataset format; the unconditional fallback.
pub trait CurrentLoader {
    type Dataset;

    fn open(&self, identifier: &str) -> Result<Self::Dataset, HubError>;
}

impl<L: LegacyLoader + ?Sized> LegacyLoader for &L {
    type Dataset = L::Dataset;

    fn load_legacy(&self, identifier: &str) -> Result<Self::Dataset, LegacyFailure> {
        (**self).load_legacy(identifier)
    }
}

impl<C: CurrentLoader + ?Sized> CurrentLoader for &C {
    type Dataset = C::Dataset;

    fn open(&self, identifier: &str) -> Result<Self::Dataset, HubError> {
        (**self).open(identifier)
    }
}
