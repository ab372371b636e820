use std::sync::Arc;

use hub_error::{ErrorPolicy, HubError, NoopPolicy};
use tracing::{debug, warn};

use crate::outcome::LoadOutcome;
use crate::strategy::{CurrentLoader, LegacyLoader};

pub const DEPRECATION_NOTICE: &str = "Deprecated Warning: Given dataset is using deprecated format v0.x. \
     Please convert to v1.x version upon availability.";

/// Which loader produced the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Legacy,
    Current,
}

/// A loaded dataset plus how it was obtained.
#[derive(Debug)]
pub struct Loaded<D> {
    pub dataset: D,
    pub format: Format,
    /// Set when the dataset came from the deprecated format.
    pub deprecation: Option<&'static str>,
}

/// Tries the legacy loader, then falls back to the current one.
///
/// | legacy outcome | result |
/// |---|---|
/// | success | legacy dataset, deprecation warning |
/// | reader unavailable | `LegacyModuleNotInstalled`, reported through the policy |
/// | not found | the legacy error, unchanged; no fallback |
/// | anything else | logged locally, current loader result |
pub struct Dispatcher<L, C> {
    legacy: L,
    current: C,
    policy: Arc<dyn ErrorPolicy>,
}

impl<L, C> Dispatcher<L, C>
where
    L: LegacyLoader,
    C: CurrentLoader<Dataset = L::Dataset>,
{
    pub fn new(legacy: L, current: C) -> Self {
        Self::with_policy(legacy, current, Arc::new(NoopPolicy))
    }

    pub fn with_policy(legacy: L, current: C, policy: Arc<dyn ErrorPolicy>) -> Self {
        Self {
            legacy,
            current,
            policy,
        }
    }

    /// Load `identifier`, returning only the dataset.
    pub fn load(&self, identifier: &str) -> Result<L::Dataset, HubError> {
        self.dispatch(identifier).map(|loaded| loaded.dataset)
    }

    /// Load `identifier` and report which format served it.
    pub fn dispatch(&self, identifier: &str) -> Result<Loaded<L::Dataset>, HubError> {
        match LoadOutcome::classify(self.legacy.load_legacy(identifier)) {
            LoadOutcome::Success(dataset) => {
                warn!(identifier, "{DEPRECATION_NOTICE}");
                Ok(Loaded {
                    dataset,
                    format: Format::Legacy,
                    deprecation: Some(DEPRECATION_NOTICE),
                })
            }
            LoadOutcome::FormatAbsent { module } => Err(self
                .policy
                .surface(HubError::legacy_module_not_installed(module))),
            LoadOutcome::NotFound(err) => {
                debug!(identifier, kind = err.name(), "legacy loader: not found");
                Err(err)
            }
            LoadOutcome::OtherFailure(probe) => {
                // the current loader may still succeed, so this is not reported
                warn!(
                    identifier,
                    error = %probe,
                    "legacy load failed; falling back to current format"
                );
                self.open_current(identifier)
            }
        }
    }

    fn open_current(&self, identifier: &str) -> Result<Loaded<L::Dataset>, HubError> {
        self.current.open(identifier).map(|dataset| Loaded {
            dataset,
            format: Format::Current,
            deprecation: None,
        })
    }
}
