//! Error taxonomy for hub datasets.
//!
//! Every failure is a [`HubError`]: an [`ErrorKind`] bound to [`Params`], with a
//! message rendered from the kind's template at construction. Classification is
//! pure; reporting to a diagnostics sink is an explicit [`ErrorPolicy`] call at
//! the boundary where the error is surfaced.

pub mod category;
pub mod diagnostic;
pub mod error;
pub mod kind;
pub mod params;
pub mod policy;
pub mod render;
pub mod result_ext;

// public exports
pub use category::{Category, Visibility};
pub use error::{ConstructionError, HubError};
pub use kind::{ErrorKind, KindSpec, Template};
pub use params::Params;
pub use policy::{CombinedPolicy, ErrorPolicy, NoopPolicy};
pub use render::render;
pub use result_ext::ResultExt;

#[cfg(feature = "diagnostic")]
pub use policy::MiettePolicy;
#[cfg(feature = "tracing")]
pub use policy::TracingPolicy;

pub type Result<T, E = HubError> = std::result::Result<T, E>;
