//! Error types for specification ingestion.

use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, SpecError>;

/// Errors raised while ingesting an API specification.
///
/// All of these are fatal to ingestion: no partial route set is ever
/// published.
#[derive(Error, Debug)]
pub enum SpecError {
    /// Input is not parseable JSON or YAML
    #[error("failed to parse spec document: {0}")]
    Parse(String),

    /// Neither a `swagger` nor an `openapi` version marker is present
    #[error("document is missing 'swagger' or 'openapi' version field")]
    MissingVersion,

    /// A `swagger` marker with a version other than 2.0
    #[error("unsupported swagger version: {0}")]
    UnsupportedSwaggerVersion(String),

    /// An `openapi` marker with a version outside the 3.x line
    #[error("unsupported openapi version: {0}")]
    UnsupportedOpenApiVersion(String),

    /// Version marker accepted but the document does not deserialize
    #[error("failed to parse OpenAPI spec: {0}")]
    InvalidSpec(String),

    /// Spec or adjustments file could not be read
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Spec could not be fetched from a URL
    #[error("failed to fetch spec: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Adjustments document is not valid YAML
    #[error("failed to parse adjustments: {0}")]
    Adjustments(#[from] serde_yaml::Error),
}
