//! Error types for AdLens

/// Result type alias using AdLens' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for AdLens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule set construction and validation errors
    #[error("rules error: {0}")]
    Rules(String),

    /// Enhancement call errors (transport, malformed response)
    #[error("enhancement error: {0}")]
    Enhancement(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new rules error
    pub fn rules(msg: impl Into<String>) -> Self {
        Self::Rules(msg.into())
    }

    /// Create a new enhancement error
    pub fn enhancement(msg: impl Into<String>) -> Self {
        Self::Enhancement(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
