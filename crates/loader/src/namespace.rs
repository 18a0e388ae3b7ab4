//! Namespace guarding for module definitions.
//!
//! The first definition in a namespace pins the signer set for that
//! namespace; later definitions must present a strictly equal set. Reserved
//! prefixes reject caller-supplied definitions outright. Both checks are
//! trust-policy concerns, independent of the trust-domain cache.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use palisade_provenance::{certs_match, Certificate};

use crate::error::{LoaderError, LoaderResult};

pub struct NamespaceRegistry {
    reserved: Vec<String>,
    signers: DashMap<String, Option<Vec<Certificate>>>,
}

impl NamespaceRegistry {
    pub fn new(reserved: Vec<String>) -> Self {
        Self {
            reserved,
            signers: DashMap::new(),
        }
    }

    /// Namespace of a dotted module name: everything before the last `.`,
    /// or the root namespace for bare names.
    fn namespace_of(name: &str) -> &str {
        name.rfind('.').map(|idx| &name[..idx]).unwrap_or("")
    }

    /// Validate `name` against reserved prefixes and the signer set already
    /// recorded for its namespace, recording the set on first sight.
    pub fn check(&self, name: &str, signers: Option<&[Certificate]>) -> LoaderResult<()> {
        for prefix in &self.reserved {
            if name.starts_with(prefix.as_str()) {
                return Err(LoaderError::ReservedNamespace {
                    namespace: prefix.clone(),
                });
            }
        }

        let namespace = Self::namespace_of(name);
        match self.signers.entry(namespace.to_string()) {
            Entry::Occupied(entry) => {
                if certs_match(entry.get().as_deref(), signers) {
                    Ok(())
                } else {
                    Err(LoaderError::SignerMismatch {
                        namespace: namespace.to_string(),
                    })
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(signers.map(<[Certificate]>::to_vec));
                Ok(())
            }
        }
    }
}
