//! hub-load: arbitrates between the deprecated 0.x dataset format and the current one.
//!
//! The [`Dispatcher`] always asks the legacy loader first so that "this dataset
//! does not exist" fails fast, while "this dataset is not in the legacy format"
//! falls through to the current loader.
pub mod dispatcher;
pub mod local;
pub mod outcome;
pub mod strategy;

pub use dispatcher::{DEPRECATION_NOTICE, Dispatcher, Format, Loaded};
pub use local::{DatasetHandle, LocalLegacyLoader, LocalLoader};
pub use outcome::LoadOutcome;
pub use strategy::{CurrentLoader, LegacyFailure, LegacyLoader};

/// Dispatcher over the directory-backed loaders rooted at `root`.
pub fn local_dispatcher(
    root: impl Into<std::path::PathBuf>,
    policy: std::sync::Arc<dyn hub_error::ErrorPolicy>,
) -> Dispatcher<LocalLegacyLoader, LocalLoader> {
    let root = root.into();
    Dispatcher::with_policy(
        LocalLegacyLoader::new(root.clone()),
        LocalLoader::new(root),
        policy,
    )
}
