//! Error types for authority-chain.
//!
//! `AuthorityError` covers failures where the engine could not determine an
//! answer: unreachable collaborators, malformed input, bad key material.
//! Expected negative verification outcomes are never errors; they are
//! reported as [`crate::verify::ErrorKind`] inside a result value.

/// System-level error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error("Role authority lookup failed: {0}")]
    Lookup(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    #[error("DID resolution failed: {0}")]
    DidResolution(String),

    #[error("Status list error: {0}")]
    StatusList(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AuthorityError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, AuthorityError>;
