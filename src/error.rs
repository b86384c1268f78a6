//! Error types for the configuration compiler

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::location::Location;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Result codes surfaced to the caller of the compiler.
///
/// Numeric values are stable and double as process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    InvalidVersion = 2,
    InvalidArgument = 3,
    NotSupported = 4,
    FileNotFound = 5,
    FileInvalid = 6,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::InvalidVersion => "INVALID_VERSION",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::FileInvalid => "FILE_INVALID",
        };
        write!(f, "{}", name)
    }
}

/// Configuration compiler errors
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Config file invalid: {0}")]
    FileInvalid(String),

    #[error("Config document is not well-formed: {0}")]
    DocumentInvalid(#[from] serde_json::Error),

    #[error("Invalid version string \"{0}\"")]
    InvalidVersion(String),

    #[error("Version {version} is not in the supported list [{supported}]")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Missing required field at {location}")]
    MissingRequiredField { location: Location },

    #[error("Field at {location} must be {expected}")]
    InvalidFieldType {
        location: Location,
        expected: &'static str,
    },

    #[error("\"{identifier}\" at {location} is not a valid identifier")]
    InvalidIdentifier {
        location: Location,
        identifier: String,
    },

    #[error("Duplicate identifiers in {location}: {}", duplicates.join(", "))]
    DuplicateIdentifier {
        location: Location,
        duplicates: Vec<String>,
    },

    #[error("Unsupported {kind} code {code} at {location}")]
    UnsupportedEnumValue {
        location: Location,
        kind: &'static str,
        code: i64,
    },

    #[error("Referenced file {} at {location} not found", path.display())]
    ReferencedFileNotFound { location: Location, path: PathBuf },

    #[error("{feature} at {location} is not supported yet")]
    NotSupported {
        location: Location,
        feature: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Result code reported to the caller for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) | Self::UnsupportedEnumValue { .. } => {
                ErrorCode::InvalidArgument
            }
            Self::FileNotFound { .. } | Self::ReferencedFileNotFound { .. } => {
                ErrorCode::FileNotFound
            }
            Self::FileInvalid(_)
            | Self::DocumentInvalid(_)
            | Self::MissingRequiredField { .. }
            | Self::InvalidFieldType { .. }
            | Self::InvalidIdentifier { .. }
            | Self::DuplicateIdentifier { .. } => ErrorCode::FileInvalid,
            Self::InvalidVersion(_) | Self::UnsupportedVersion { .. } => ErrorCode::InvalidVersion,
            Self::NotSupported { .. } => ErrorCode::NotSupported,
            Self::Io(_) => ErrorCode::Failure,
        }
    }

    /// Document location of the error, when it concerns a document element
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::MissingRequiredField { location }
            | Self::InvalidFieldType { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::DuplicateIdentifier { location, .. }
            | Self::UnsupportedEnumValue { location, .. }
            | Self::ReferencedFileNotFound { location, .. }
            | Self::NotSupported { location, .. } => Some(location),
            _ => None,
        }
    }
}
