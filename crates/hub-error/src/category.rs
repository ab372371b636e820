//! Coarse-grained classification for programmatic handling of errors.
//!
//! Typical mappings:
//! - UserInput: missing or invalid parameters, shape mismatches
//! - RemoteService: authorization, bad request, server error, timeout, gateway
//! - Environment: missing optional modules, local storage problems
//! - Internal: control-flow errors used while probing formats; never reported
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    UserInput,
    RemoteService,
    Environment,
    Internal,
}

impl Category {
    /// Internal errors stay local; everything else is eligible for diagnostics.
    pub fn visibility(self) -> Visibility {
        match self {
            Category::Internal => Visibility::Silent,
            _ => Visibility::Reportable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::UserInput => "user-input",
            Category::RemoteService => "remote-service",
            Category::Environment => "environment",
            Category::Internal => "internal",
        }
    }

    /// Process exit status used when an error of this category ends a CLI run.
    pub fn exit_code(self) -> u8 {
        match self {
            Category::Internal => 1,
            Category::UserInput => 2,
            Category::RemoteService => 3,
            Category::Environment => 4,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an error may be sent to the diagnostics sink.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Reportable,
    Silent,
}

impl Visibility {
    pub fn is_reportable(self) -> bool {
        matches!(self, Visibility::Reportable)
    }
}
