/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when the response payload does not have the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The request did not complete in time
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The provider answered with no translated text and empty answers are rejected
    #[error("Provider returned an empty translation for '{0}'")]
    EmptyTranslation(String),
}

/// Malformed media or style tokens found while resolving placeholders.
///
/// These never abort a run: the token is left visible in the output and the
/// error is reported as a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    /// A `----media/...----` token that does not match the image grammar
    #[error("Malformed media placeholder: {0}")]
    MalformedMedia(String),

    /// A `font-size:` declaration that is not `<digits>pt`
    #[error("Malformed style placeholder: {0}")]
    MalformedStyle(String),
}

/// Errors raised while reading the source document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be opened
    #[error("Failed to open document {path}: {message}")]
    Open {
        /// Path of the document
        path: String,
        /// Underlying reason
        message: String,
    },

    /// The document was opened but its content could not be parsed
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// The input format is not supported
    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    /// I/O failure while writing extracted images
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
