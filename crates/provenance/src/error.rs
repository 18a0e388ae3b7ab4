//! Error types for provenance operations.

use thiserror::Error;

/// Errors that can occur when working with signer certificates.
#[derive(Debug, Error)]
pub enum ProvenanceError {
    /// The certificate carries a public key that is not a valid Ed25519 key
    #[error("Malformed public key: {0}")]
    MalformedKey(String),

    /// The certificate signature bytes are not a valid Ed25519 signature
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Signature verification failed
    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),
}

/// Result type for provenance operations.
pub type ProvenanceResult<T> = std::result::Result<T, ProvenanceError>;
