use std::fmt::{Debug, Display};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::render::render;
use crate::{Category, ErrorKind, Params, Visibility};

/// Programming errors raised while building a [`HubError`]. These are never reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("{kind} requires parameter '{param}'")]
    MissingParam {
        kind: &'static str,
        param: &'static str,
    },

    #[error("unknown error kind '{0}'")]
    UnknownKind(String),
}

/// A classified error: a kind bound to concrete parameters, with its message
/// already rendered.
///
/// Clones share one "reported" flag so that a diagnostics report is attempted at
/// most once per error, however many times it is passed along.
#[derive(Clone, thiserror::Error)]
#[error("{message}")]
pub struct HubError {
    kind: ErrorKind,
    params: Params,
    message: String,
    reported: Arc<AtomicBool>,
}

impl HubError {
    /// Validate `params` against the kind's required parameters and render the message.
    pub fn new(kind: ErrorKind, params: Params) -> Result<Self, ConstructionError> {
        let spec = kind.spec();
        if let Some(param) = spec.required.iter().copied().find(|p| !params.contains(p)) {
            return Err(ConstructionError::MissingParam {
                kind: spec.name,
                param,
            });
        }
        Ok(Self::assemble(kind, params))
    }

    /// Construct a kind that takes no required parameters.
    pub fn from_kind(kind: ErrorKind) -> Result<Self, ConstructionError> {
        Self::new(kind, Params::new())
    }

    fn assemble(kind: ErrorKind, params: Params) -> Self {
        let message = render(kind, &params);
        Self {
            kind,
            params,
            message,
            reported: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dataset_not_found(tag: impl Display) -> Self {
        Self::assemble(ErrorKind::DatasetNotFound, Params::new().with("tag", tag))
    }

    /// `response` is the raw body returned by the server.
    pub fn authorization(response: impl Display) -> Self {
        Self::assemble(
            ErrorKind::Authorization,
            Params::new().with("response", response),
        )
    }

    /// `response` is the raw body returned by the server.
    pub fn bad_request(response: impl Display) -> Self {
        Self::assemble(
            ErrorKind::BadRequest,
            Params::new().with("response", response),
        )
    }

    pub fn value_shape(expected: &impl Debug, actual: &impl Debug) -> Self {
        Self::assemble(
            ErrorKind::ValueShape,
            Params::new()
                .with("expected", format!("{expected:?}"))
                .with("actual", format!("{actual:?}")),
        )
    }

    /// `reason` is one of `none`, `length`, `not_equal`; anything else gets the generic message.
    pub fn dynamic_tensor_shape(reason: impl Display) -> Self {
        Self::assemble(
            ErrorKind::DynamicTensorShape,
            Params::new().with("reason", reason),
        )
    }

    pub fn module_not_installed(module: impl Display) -> Self {
        Self::assemble(
            ErrorKind::ModuleNotInstalled,
            Params::new().with("module", module),
        )
    }

    pub fn legacy_module_not_installed(module: impl Display) -> Self {
        Self::assemble(
            ErrorKind::LegacyModuleNotInstalled,
            Params::new().with("module", module),
        )
    }

    pub fn permission_denied(url: impl Display) -> Self {
        Self::assemble(ErrorKind::PermissionDenied, Params::new().with("url", url))
    }

    pub fn directory_not_empty(dst_url: impl Display) -> Self {
        Self::assemble(
            ErrorKind::DirectoryNotEmpty,
            Params::new().with("dst_url", dst_url),
        )
    }

    pub fn wrong_username(username: impl Display) -> Self {
        Self::assemble(
            ErrorKind::WrongUsername,
            Params::new().with("username", username),
        )
    }

    pub fn none_value(param: impl Display) -> Self {
        Self::assemble(ErrorKind::NoneValue, Params::new().with("param", param))
    }

    pub fn info_not_found(detail: impl Display) -> Self {
        Self::assemble(ErrorKind::InfoNotFound, Params::new().with("detail", detail))
    }

    pub fn file_system(detail: impl Display) -> Self {
        Self::assemble(ErrorKind::FileSystem, Params::new().with("detail", detail))
    }

    /// Silent control-flow error used while probing the legacy format.
    pub fn legacy_probe(reason: impl Display) -> Self {
        Self::assemble(
            ErrorKind::LegacyFormatProbe,
            Params::new().with("reason", reason),
        )
    }

    /// A kind with an optional `detail` suffix, or an overridable default message.
    ///
    /// Falls back to [`HubError::new`] validation for kinds with required parameters.
    pub fn with_detail(kind: ErrorKind, detail: impl Display) -> Result<Self, ConstructionError> {
        let key = if kind.spec().overridable {
            "message"
        } else {
            "detail"
        };
        Self::new(kind, Params::new().with(key, detail))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn visibility(&self) -> Visibility {
        self.kind.visibility()
    }

    pub fn is_reportable(&self) -> bool {
        self.visibility().is_reportable()
    }

    /// Claim the single report attempt for this error.
    ///
    /// Returns `true` for the first caller only; later calls (including through
    /// clones) return `false`.
    pub fn mark_reported(&self) -> bool {
        !self.reported.swap(true, Ordering::AcqRel)
    }

    pub fn was_reported(&self) -> bool {
        self.reported.load(Ordering::Acquire)
    }

    /// Remediation hint for errors the user can fix locally.
    pub fn help(&self) -> Option<String> {
        match self.kind {
            ErrorKind::LegacyModuleNotInstalled => self.params.get("module").map(|m| {
                format!("rebuild with the `{m}` feature enabled to read legacy datasets")
            }),
            ErrorKind::ModuleNotInstalled => self
                .params
                .get("module")
                .map(|m| format!("install or enable `{m}` and retry")),
            ErrorKind::Authentication => Some("log in again to refresh your credentials".into()),
            _ => None,
        }
    }
}

impl Debug for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubError")
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("message", &self.message)
            .field("reported", &self.was_reported())
            .finish()
    }
}

impl PartialEq for HubError {
    /// Equality ignores the report flag.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.params == other.params && self.message == other.message
    }
}
