//! Signer certificates attached to loaded module images.
//!
//! Chain validation happens upstream of the loader; this module only models
//! the certificate value itself plus the strict set-equality used when two
//! provenance descriptors are compared for cache identity.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::{ProvenanceError, ProvenanceResult};

/// X.509-like certificate identifying a module signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate serial number
    pub serial: String,
    /// Subject (signer being certified)
    pub subject: String,
    /// Issuer (certificate authority)
    pub issuer: String,
    /// Subject's public key (raw Ed25519 bytes)
    pub public_key: Vec<u8>,
    /// Not valid before (Unix timestamp, milliseconds)
    pub not_before: u64,
    /// Not valid after (Unix timestamp, milliseconds)
    pub not_after: u64,
    /// Issuer signature over the signing payload
    pub signature: Vec<u8>,
}

impl Certificate {
    /// Stable fingerprint of the subject key, hex-encoded.
    pub fn fingerprint(&self) -> String {
        hex::encode(blake3::hash(&self.public_key).as_bytes())
    }

    /// Byte string covered by the issuer signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(self.serial.as_bytes());
        payload.push(0);
        payload.extend_from_slice(self.subject.as_bytes());
        payload.push(0);
        payload.extend_from_slice(self.issuer.as_bytes());
        payload.push(0);
        payload.extend_from_slice(&self.public_key);
        payload.extend_from_slice(&self.not_before.to_le_bytes());
        payload.extend_from_slice(&self.not_after.to_le_bytes());
        payload
    }

    /// Verify the issuer signature against a known issuer key.
    ///
    /// This is a utility for the upstream chain validator; nothing on the
    /// trust-domain cache path calls it.
    pub fn verify_with(&self, issuer_key: &VerifyingKey) -> ProvenanceResult<()> {
        let signature = Signature::from_slice(&self.signature)
            .map_err(|e| ProvenanceError::MalformedSignature(e.to_string()))?;

        issuer_key
            .verify(&self.signing_payload(), &signature)
            .map_err(|e| ProvenanceError::SignatureVerification(e.to_string()))
    }
}

/// Strict signer-set equality.
///
/// Absent sets match only absent sets. Present sets match when they have the
/// same cardinality and each certificate in one has an equal counterpart in
/// the other, regardless of order.
pub fn certs_match(a: Option<&[Certificate]>, b: Option<&[Certificate]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a.iter().all(|cert| b.contains(cert))
                && b.iter().all(|cert| a.contains(cert))
        }
        _ => false,
    }
}
