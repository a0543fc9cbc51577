/// Error types for the ECOS client
use thiserror::Error;

/// Main error type for ECOS operations
#[derive(Error, Debug)]
pub enum EcosError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Response body is not well-formed XML
    #[error("Failed to parse XML response: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// No API key was supplied
    #[error("An ECOS API key is required")]
    MissingApiKey,
}

/// Type alias for Results using EcosError
pub type Result<T> = std::result::Result<T, EcosError>;
