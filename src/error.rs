//! Error types for Linkscape API operations.

use thiserror::Error;

/// Errors that can occur while validating, building, or sending a request.
#[derive(Debug, Error)]
pub enum LinkscapeError {
    /// Configuration is missing or incomplete.
    #[error("Linkscape configuration required: {0}")]
    ConfigMissing(String),

    /// A parameter has the wrong type (expected a number or a string).
    #[error("Invalid datatype provided for {field}")]
    InvalidDatatype { field: String },

    /// A column list was not a list of strings.
    #[error("Wrong datatype provided for {field}")]
    WrongDatatype { field: String },

    /// A value checked against a reference list was itself a list.
    #[error("Incorrect datatype for {label}")]
    IncorrectDatatype { label: String },

    /// A target is not shaped like a URL.
    #[error("{0} is not a valid url")]
    InvalidUrl(String),

    /// A column label has no bit position in the registry.
    #[error("Invalid Bit Flag: {label} (not a {kind} column)")]
    InvalidFlag { kind: &'static str, label: String },

    /// A sort field is not allowed for the given scope.
    #[error("Invalid mapping between {scope} and {field}")]
    InvalidMapping { scope: String, field: String },

    /// The schema has no reference values for a field.
    #[error("No field found on schema for {label}")]
    MissingReference { label: String },

    /// A value is not one of the allowed values.
    #[error("{value} not found in {label}.")]
    NotFound { value: String, label: String },

    /// A required value is absent.
    #[error("{0} not present!")]
    NotPresent(String),

    /// A parameter key is not accepted by the endpoint.
    #[error("Unrecognized parameter: {0}")]
    UnrecognizedParameter(String),

    /// API request failed.
    #[error("Linkscape API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Broad classes of [`LinkscapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or incomplete credentials; raised at construction.
    Configuration,
    /// A parameter has the wrong datatype.
    Type,
    /// A parameter is present but semantically invalid.
    Validation,
    /// The request could not be completed.
    Transport,
}

impl LinkscapeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing(_) => ErrorKind::Configuration,
            Self::InvalidDatatype { .. }
            | Self::WrongDatatype { .. }
            | Self::IncorrectDatatype { .. } => ErrorKind::Type,
            Self::InvalidUrl(_)
            | Self::InvalidFlag { .. }
            | Self::InvalidMapping { .. }
            | Self::MissingReference { .. }
            | Self::NotFound { .. }
            | Self::NotPresent(_)
            | Self::UnrecognizedParameter(_) => ErrorKind::Validation,
            Self::ApiError { .. } | Self::HttpError(_) | Self::ParseError(_) | Self::UrlError(_) => {
                ErrorKind::Transport
            }
        }
    }
}

/// Result type alias for Linkscape operations.
pub type Result<T> = core::result::Result<T, LinkscapeError>;
