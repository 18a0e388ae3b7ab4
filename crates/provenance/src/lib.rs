//! Code provenance primitives for Palisade.
//!
//! This crate models where a module image came from: the signing
//! certificates attached to it, the opaque origin location it was fetched
//! from, and the derived cache identity (`OriginKey`) the trust-domain cache
//! is keyed on.

pub mod certificate;
pub mod descriptor;
pub mod error;
pub mod key;

pub use certificate::{certs_match, Certificate};
pub use descriptor::Provenance;
pub use error::{ProvenanceError, ProvenanceResult};
pub use key::OriginKey;
