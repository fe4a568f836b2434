/*!
 * Error types for the jp2subs translation engine.
 *
 * The taxonomy follows the three failure classes of the engine:
 * - configuration errors, raised before any translation work starts
 * - provider transport errors, propagated immediately and never retried here
 * - alignment incompleteness, which is not an error at all and is recovered
 *   inside the alignment protocol
 */

use thiserror::Error;

/// Errors raised while validating options or resolving providers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An enumerated option received a value outside its allowed set
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidOption {
        /// Option name (e.g. "honorifics")
        name: &'static str,
        /// Rejected value
        value: String,
        /// Human readable list of accepted values
        expected: &'static str,
    },

    /// Block size must be at least one segment
    #[error("block size must be at least 1")]
    InvalidBlockSize,

    /// The remote provider was selected without an endpoint
    #[error("an API endpoint is required for the api provider (set JP2SUBS_API_URL)")]
    MissingEndpoint,

    /// The configured endpoint is not a usable URL
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    /// Unknown ISO language code
    #[error("invalid language code: {0}")]
    InvalidLanguage(String),
}

/// Errors that can occur when a provider translates a block
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The local binary could not be started
    #[error("failed to start '{binary}': {message}")]
    Spawn {
        /// Binary that failed to start
        binary: String,
        /// Underlying OS error
        message: String,
    },

    /// The local binary exited with a non-zero status
    #[error("process exited with {status}: {stderr}")]
    ProcessFailed {
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The caller asked for the in-flight call to stop
    #[error("translation cancelled")]
    Cancelled,
}

/// Errors that can occur during document translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Invalid options or provider configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether the failure was a user-requested cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::Cancelled))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error reading or writing a JSON document
    #[error("Document error: {0}")]
    Document(String),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Document(error.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::Translation(TranslationError::Config(error))
    }
}
