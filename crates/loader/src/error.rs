//! Error types for loader operations.

use thiserror::Error;

/// Errors raised by the overridable permission-resolution hook.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy data could not be parsed
    #[error("Malformed policy data: {0}")]
    Malformed(String),

    /// The policy backend failed
    #[error("Policy backend error: {0}")]
    Backend(String),

    /// I/O error while consulting policy
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while defining a module.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// offset/length do not describe a valid sub-range of the byte source
    #[error("Byte range {offset}+{length} out of bounds for a source of {size} bytes")]
    OutOfRange {
        offset: usize,
        length: usize,
        size: usize,
    },

    /// The module image is malformed (raised by the defining primitive)
    #[error("Malformed module image: {0}")]
    Format(String),

    /// The module name falls in a reserved namespace
    #[error("Namespace is reserved: {namespace}")]
    ReservedNamespace { namespace: String },

    /// The signer set differs from the one already recorded for the namespace
    #[error("Signer set does not match namespace {namespace}")]
    SignerMismatch { namespace: String },

    /// Permission resolution failed while building a trust domain
    #[error("Permission resolution failed: {0}")]
    PermissionResolution(#[from] PolicyError),
}

/// Result type for the permission-resolution hook.
pub type PolicyResult<T> = std::result::Result<T, PolicyError>;

/// Result type for loader operations.
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;
