//! Code provenance descriptors.

use serde::{Deserialize, Serialize};

use crate::certificate::{self, Certificate};

/// Where a module image came from: an opaque origin location plus the
/// certificates of whoever signed it.
///
/// The location is carried as the exact string the caller supplied. It is
/// never parsed, canonicalized, or resolved against a name service; two
/// locations a resolver would consider equivalent stay distinct here.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    location: Option<String>,
    signers: Option<Vec<Certificate>>,
}

impl Provenance {
    /// Descriptor for code fetched from `location` and signed by `signers`.
    pub fn new(location: impl Into<String>, signers: Option<Vec<Certificate>>) -> Self {
        Self {
            location: Some(location.into()),
            signers,
        }
    }

    /// Descriptor for unsigned code fetched from `location`.
    pub fn unsigned(location: impl Into<String>) -> Self {
        Self::new(location, None)
    }

    /// Descriptor for code of unknown origin. Requests carrying it never
    /// resolve to a trust domain.
    pub fn unknown() -> Self {
        Self {
            location: None,
            signers: None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn signers(&self) -> Option<&[Certificate]> {
        self.signers.as_deref()
    }

    /// The location with any `#fragment` suffix stripped, textually.
    pub fn location_no_fragment(&self) -> Option<&str> {
        self.location.as_deref().map(|loc| match loc.split_once('#') {
            Some((base, _)) => base,
            None => loc,
        })
    }

    /// Strict signer-set comparison against another descriptor.
    pub fn matches_signers(&self, other: &Provenance) -> bool {
        certificate::certs_match(self.signers(), other.signers())
    }
}
