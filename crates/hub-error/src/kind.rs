use std::str::FromStr;

use crate::{Category, ConstructionError, Visibility};

/// Closed set of error categories known to the taxonomy.
///
/// The per-kind contract (name, category, required parameters, message
/// template) lives in one lookup table, [`ErrorKind::spec`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ErrorKind {
    // storage and array-level failures
    OutOfBounds,
    Alignment,
    IncompatibleShapes,
    IncompatibleBroadcasting,
    IncompatibleTypes,
    WrongType,
    NotAuthorized,
    InfoNotFound,
    FileSystem,
    S3,
    S3CredsParse,
    NotZarrFolder,
    StorageTensorNotFound,

    // remote service responses
    Authentication,
    Authorization,
    ResourceNotFound,
    BadRequest,
    OverLimit,
    Server,
    BadGateway,
    GatewayTimeout,
    WaitTimeout,
    Locked,

    // dataset api
    DatasetNotFound,
    PermissionDenied,
    ShapeArgumentNotFound,
    SchemaArgumentNotFound,
    DirectoryNotEmpty,
    ValueShape,
    NoneValue,
    ShapeLength,
    ModuleNotInstalled,
    LegacyModuleNotInstalled,
    WrongUsername,
    NotDatasetToOverwrite,
    NotDatasetToAppend,
    DynamicTensorNotFound,
    DynamicTensorShape,
    NotIterable,
    AdvancedSlicingNotSupported,

    // control flow
    LegacyFormatProbe,
}

/// How a kind turns its parameters into a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    /// Constant text.
    Fixed(&'static str),
    /// Constant text, followed by `: {detail}` when a `detail` parameter is given.
    Detailed(&'static str),
    /// Text with `{name}` placeholders filled from parameters.
    Interpolated(&'static str),
    /// Reads a `message` field from the JSON body stored in the `response`
    /// parameter. `extracted` may use `{message}`, `raw_fallback` may use
    /// `{raw}` (the unparsed body, used when it is non-empty).
    ResponseMessage {
        extracted: &'static str,
        fallback: &'static str,
        raw_fallback: Option<&'static str>,
    },
    /// Picks a message by the value of the `reason` parameter.
    Reason {
        choices: &'static [(&'static str, &'static str)],
        otherwise: &'static str,
    },
}

/// Static contract of one [`ErrorKind`].
#[derive(Clone, Copy, Debug)]
pub struct KindSpec {
    pub name: &'static str,
    pub category: Category,
    pub required: &'static [&'static str],
    pub template: Template,
    /// A `message` parameter replaces the default text.
    pub overridable: bool,
}

const fn spec(
    name: &'static str,
    category: Category,
    required: &'static [&'static str],
    template: Template,
) -> KindSpec {
    KindSpec {
        name,
        category,
        required,
        template,
        overridable: false,
    }
}

const fn overridable(name: &'static str, category: Category, text: &'static str) -> KindSpec {
    KindSpec {
        name,
        category,
        required: &[],
        template: Template::Fixed(text),
        overridable: true,
    }
}

use Category::{Environment, Internal, RemoteService, UserInput};
use Template::{Detailed, Fixed, Interpolated};

const DYNAMIC_SHAPE_REASONS: &[(&str, &str)] = &[
    ("none", "Parameter 'max_shape' shouldn't contain any 'None' value"),
    ("length", "Lengths of 'shape' and 'max_shape' should be equal"),
    (
        "not_equal",
        "All not-None values from 'shape' should be equal to the corresponding values in 'max_shape'",
    ),
];

impl ErrorKind {
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::OutOfBounds,
        ErrorKind::Alignment,
        ErrorKind::IncompatibleShapes,
        ErrorKind::IncompatibleBroadcasting,
        ErrorKind::IncompatibleTypes,
        ErrorKind::WrongType,
        ErrorKind::NotAuthorized,
        ErrorKind::InfoNotFound,
        ErrorKind::FileSystem,
        ErrorKind::S3,
        ErrorKind::S3CredsParse,
        ErrorKind::NotZarrFolder,
        ErrorKind::StorageTensorNotFound,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::ResourceNotFound,
        ErrorKind::BadRequest,
        ErrorKind::OverLimit,
        ErrorKind::Server,
        ErrorKind::BadGateway,
        ErrorKind::GatewayTimeout,
        ErrorKind::WaitTimeout,
        ErrorKind::Locked,
        ErrorKind::DatasetNotFound,
        ErrorKind::PermissionDenied,
        ErrorKind::ShapeArgumentNotFound,
        ErrorKind::SchemaArgumentNotFound,
        ErrorKind::DirectoryNotEmpty,
        ErrorKind::ValueShape,
        ErrorKind::NoneValue,
        ErrorKind::ShapeLength,
        ErrorKind::ModuleNotInstalled,
        ErrorKind::LegacyModuleNotInstalled,
        ErrorKind::WrongUsername,
        ErrorKind::NotDatasetToOverwrite,
        ErrorKind::NotDatasetToAppend,
        ErrorKind::DynamicTensorNotFound,
        ErrorKind::DynamicTensorShape,
        ErrorKind::NotIterable,
        ErrorKind::AdvancedSlicingNotSupported,
        ErrorKind::LegacyFormatProbe,
    ];

    pub fn spec(self) -> KindSpec {
        match self {
            ErrorKind::OutOfBounds => spec(
                "OutOfBounds",
                UserInput,
                &[],
                Detailed("Chunk index is out of bounds"),
            ),
            ErrorKind::Alignment => {
                spec("Alignment", UserInput, &[], Detailed("Arrays are not aligned"))
            }
            ErrorKind::IncompatibleShapes => spec(
                "IncompatibleShapes",
                UserInput,
                &[],
                Detailed("Shapes do not match"),
            ),
            ErrorKind::IncompatibleBroadcasting => spec(
                "IncompatibleBroadcasting",
                UserInput,
                &[],
                Detailed("Shapes can not be broadcast together"),
            ),
            ErrorKind::IncompatibleTypes => spec(
                "IncompatibleTypes",
                UserInput,
                &[],
                Detailed("Types can not be cast"),
            ),
            ErrorKind::WrongType => {
                spec("WrongType", UserInput, &[], Detailed("Type is not supported"))
            }
            ErrorKind::NotAuthorized => {
                spec("NotAuthorized", RemoteService, &[], Detailed("Not authorized"))
            }
            ErrorKind::InfoNotFound => spec(
                "InfoNotFound",
                Environment,
                &[],
                Detailed("Info could not be found for array"),
            ),
            ErrorKind::FileSystem => spec(
                "FileSystem",
                Environment,
                &[],
                Detailed("Error working with the local file system"),
            ),
            ErrorKind::S3 => spec("S3", RemoteService, &[], Detailed("Error working with S3")),
            ErrorKind::S3CredsParse => spec(
                "S3CredsParse",
                Environment,
                &[],
                Detailed("Can't parse AWS credentials"),
            ),
            ErrorKind::NotZarrFolder => spec(
                "NotZarrFolder",
                Environment,
                &[],
                Detailed("Directory is not a zarr folder"),
            ),
            ErrorKind::StorageTensorNotFound => spec(
                "StorageTensorNotFound",
                Environment,
                &[],
                Detailed("Storage tensor was not found"),
            ),

            ErrorKind::Authentication => overridable(
                "Authentication",
                RemoteService,
                "Authentication failed. Please login again.",
            ),
            ErrorKind::Authorization => spec(
                "Authorization",
                RemoteService,
                &["response"],
                Template::ResponseMessage {
                    extracted: "{message}",
                    fallback: "You are not authorized to access this resource.",
                    raw_fallback: None,
                },
            ),
            ErrorKind::ResourceNotFound => overridable(
                "ResourceNotFound",
                RemoteService,
                "The resource you are looking for was not found. Check if the name or id is correct.",
            ),
            ErrorKind::BadRequest => spec(
                "BadRequest",
                RemoteService,
                &["response"],
                Template::ResponseMessage {
                    extracted: "One or more request parameters is incorrect\n{message}",
                    fallback: "One or more request parameters is incorrect",
                    raw_fallback: Some("One or more request parameters is incorrect, {raw}"),
                },
            ),
            ErrorKind::OverLimit => overridable(
                "OverLimit",
                RemoteService,
                "You are over the allowed limits for this operation. Consider upgrading your account.",
            ),
            ErrorKind::Server => overridable("Server", RemoteService, "Internal server error."),
            ErrorKind::BadGateway => overridable(
                "BadGateway",
                RemoteService,
                "Invalid response from server.",
            ),
            ErrorKind::GatewayTimeout => overridable(
                "GatewayTimeout",
                RemoteService,
                "Server took too long to respond.",
            ),
            ErrorKind::WaitTimeout => overridable(
                "WaitTimeout",
                RemoteService,
                "Timeout waiting for server state update.",
            ),
            ErrorKind::Locked => overridable("Locked", RemoteService, "Resource locked."),

            ErrorKind::DatasetNotFound => spec(
                "DatasetNotFound",
                UserInput,
                &["tag"],
                Interpolated("The dataset with tag {tag} was not found"),
            ),
            ErrorKind::PermissionDenied => spec(
                "PermissionDenied",
                UserInput,
                &["url"],
                Interpolated("No permission to store the dataset at {url}"),
            ),
            ErrorKind::ShapeArgumentNotFound => spec(
                "ShapeArgumentNotFound",
                UserInput,
                &[],
                Fixed("Parameter 'shape' should be provided for Dataset creation."),
            ),
            ErrorKind::SchemaArgumentNotFound => spec(
                "SchemaArgumentNotFound",
                UserInput,
                &[],
                Fixed("Parameter 'schema' should be provided for Dataset creation."),
            ),
            ErrorKind::DirectoryNotEmpty => spec(
                "DirectoryNotEmpty",
                UserInput,
                &["dst_url"],
                Interpolated(
                    "The destination url {dst_url} for copying dataset is not empty. \
                     Delete the directory manually or use Dataset.delete if it's a Hub dataset",
                ),
            ),
            ErrorKind::ValueShape => spec(
                "ValueShape",
                UserInput,
                &["expected", "actual"],
                Interpolated(
                    "parameter 'value': expected array with shape {expected}, got {actual}",
                ),
            ),
            ErrorKind::NoneValue => spec(
                "NoneValue",
                UserInput,
                &["param"],
                Interpolated("Parameter '{param}' should be provided"),
            ),
            ErrorKind::ShapeLength => spec(
                "ShapeLength",
                UserInput,
                &[],
                Fixed("Parameter 'shape' should be a tuple of length 1"),
            ),
            ErrorKind::ModuleNotInstalled => spec(
                "ModuleNotInstalled",
                Environment,
                &["module"],
                Interpolated(
                    "Module '{module}' should be installed to convert the Dataset to the {module} format",
                ),
            ),
            ErrorKind::LegacyModuleNotInstalled => spec(
                "LegacyModuleNotInstalled",
                Environment,
                &["module"],
                Interpolated(
                    "{module} has been deprecated and made optional. \
                     Datasets in the legacy 0.x format require {module} to load. \
                     Please enable it and retry.",
                ),
            ),
            ErrorKind::WrongUsername => spec(
                "WrongUsername",
                UserInput,
                &["username"],
                Interpolated(
                    "Username {username} doesn't have access to the given url. \
                     Please check your permissions or make sure that the username provided \
                     in the url matches the one used during login.",
                ),
            ),
            ErrorKind::NotDatasetToOverwrite => spec(
                "NotDatasetToOverwrite",
                UserInput,
                &[],
                Fixed(
                    "Unable to overwrite the dataset. \
                     The provided directory is not empty and doesn't contain information about any Hub Dataset. \
                     This is a safety check so it won't be possible to overwrite (delete) any folder other than Dataset folder. \
                     If this error persists in case of Dataset folder then it means your Dataset data is corrupted.",
                ),
            ),
            ErrorKind::NotDatasetToAppend => spec(
                "NotDatasetToAppend",
                UserInput,
                &[],
                Fixed(
                    "Unable to append to the dataset. \
                     The provided directory is not empty and doesn't contain information about any Hub Dataset",
                ),
            ),
            ErrorKind::DynamicTensorNotFound => spec(
                "DynamicTensorNotFound",
                Environment,
                &[],
                Fixed("Unable to find dynamic tensor"),
            ),
            ErrorKind::DynamicTensorShape => spec(
                "DynamicTensorShape",
                UserInput,
                &["reason"],
                Template::Reason {
                    choices: DYNAMIC_SHAPE_REASONS,
                    otherwise: "Wrong 'shape' or 'max_shape' values",
                },
            ),
            ErrorKind::NotIterable => spec(
                "NotIterable",
                UserInput,
                &[],
                Fixed("First argument to transform function should be iterable"),
            ),
            ErrorKind::AdvancedSlicingNotSupported => spec(
                "AdvancedSlicingNotSupported",
                UserInput,
                &[],
                Fixed("Advanced slicing is not supported, only support index"),
            ),

            ErrorKind::LegacyFormatProbe => spec(
                "LegacyFormatProbe",
                Internal,
                &["reason"],
                Interpolated("Legacy format probe failed: {reason}"),
            ),
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn category(self) -> Category {
        self.spec().category
    }

    pub fn visibility(self) -> Visibility {
        self.category().visibility()
    }

    pub fn required_params(self) -> &'static [&'static str] {
        self.spec().required
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorKind {
    type Err = ConstructionError;

    /// Case-insensitive lookup by kind name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConstructionError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for kind in ErrorKind::ALL {
            assert!(seen.insert(kind.name()), "duplicate name {}", kind.name());
            assert_eq!(kind.name().parse::<ErrorKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(
            "datasetnotfound".parse::<ErrorKind>().unwrap(),
            ErrorKind::DatasetNotFound
        );
        assert!(matches!(
            "NoSuchKind".parse::<ErrorKind>(),
            Err(ConstructionError::UnknownKind(_))
        ));
    }

    #[test]
    fn probe_is_the_only_silent_kind() {
        let silent: Vec<_> = ErrorKind::ALL
            .iter()
            .filter(|k| !k.visibility().is_reportable())
            .collect();
        assert_eq!(silent, vec![&ErrorKind::LegacyFormatProbe]);
    }

    #[test]
    fn interpolated_templates_name_their_required_params() {
        for kind in ErrorKind::ALL {
            if let Template::Interpolated(text) = kind.spec().template {
                for param in kind.required_params() {
                    assert!(
                        text.contains(&format!("{{{param}}}")),
                        "{kind} template does not use {param}"
                    );
                }
            }
        }
    }
}
