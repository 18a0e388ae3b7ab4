//! Origin keys: the cache identity derived from a provenance descriptor.

use std::hash::{Hash, Hasher};

use crate::certificate;
use crate::descriptor::Provenance;

/// Normalized, hashable identity of a code origin.
///
/// Deriving a key is pure and infallible; it performs no I/O and, in
/// particular, no name-service lookup. The hash covers only the
/// fragment-stripped location string, so keys for the same location with
/// different signer sets collide deliberately and are told apart by the
/// equality check, which additionally requires strict signer-set equality.
#[derive(Debug, Clone)]
pub struct OriginKey {
    provenance: Provenance,
}

impl OriginKey {
    /// Derive the cache key for a descriptor.
    pub fn derive(provenance: &Provenance) -> Self {
        Self {
            provenance: provenance.clone(),
        }
    }

    /// The descriptor this key was derived from.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

impl Hash for OriginKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provenance.location_no_fragment().hash(state);
    }
}

impl PartialEq for OriginKey {
    fn eq(&self, other: &Self) -> bool {
        self.provenance.location_no_fragment() == other.provenance.location_no_fragment()
            && certificate::certs_match(self.provenance.signers(), other.provenance.signers())
    }
}

impl Eq for OriginKey {}
