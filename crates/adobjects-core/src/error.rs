//! Directory error types
//!
//! Error definitions with transient/permanent classification. Absence of data
//! is never an error here: finders return `None` and adapters return empty
//! values.

use thiserror::Error;

/// Error that can occur while querying or materializing directory objects.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Query errors
    /// A filter tree is malformed (e.g. an empty AND/OR group).
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// A single-result finder matched more than one entry.
    #[error("ambiguous result: {count} entries matched {filter}")]
    AmbiguousResult { filter: String, count: usize },

    // Data errors
    /// A binary or structured attribute value could not be decoded.
    #[error("failed to decode attribute '{attribute}': {message}")]
    Decode { attribute: String, message: String },

    /// Invalid data supplied by the caller.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    // Store errors
    /// The store reported a failure during search, commit or create.
    #[error("directory store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to establish a session with the store.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Bind credentials were rejected.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    /// Connection configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A write targeted an entry that does not exist.
    #[error("object not found: {dn}")]
    ObjectNotFound { dn: String },

    /// A create targeted a DN that is already taken.
    #[error("object already exists: {dn}")]
    ObjectAlreadyExists { dn: String },
}

impl DirectoryError {
    /// Check if this error is transient and the operation could be retried
    /// by the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::ConnectionFailed { .. })
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::InvalidFilter { .. } => "INVALID_FILTER",
            DirectoryError::AmbiguousResult { .. } => "AMBIGUOUS_RESULT",
            DirectoryError::Decode { .. } => "DECODE_ERROR",
            DirectoryError::InvalidData { .. } => "INVALID_DATA",
            DirectoryError::Store { .. } => "STORE_IO",
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::AuthenticationFailed => "AUTH_FAILED",
            DirectoryError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            DirectoryError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            DirectoryError::ObjectAlreadyExists { .. } => "OBJECT_EXISTS",
        }
    }

    // Convenience constructors

    /// Create an invalid filter error.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        DirectoryError::InvalidFilter {
            message: message.into(),
        }
    }

    /// Create a decode error for the given attribute.
    pub fn decode(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::Decode {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        DirectoryError::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with source.
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
