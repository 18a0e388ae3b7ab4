//! Trust-domain resolution and provenance-gated module definition.
//!
//! Code enters the system through [`SecureLoader`]: raw module images plus a
//! provenance descriptor. The loader resolves an immutable [`TrustDomain`]
//! for the descriptor through a concurrent, single-flight [`DomainCache`]
//! and hands both across the opaque [`ModuleDefiner`] seam. Permission
//! resolution is an injected capability ([`PermissionResolver`]), empty by
//! default.

pub mod cache;
pub mod context;
pub mod domain;
pub mod error;
pub mod loader;
pub mod namespace;
pub mod permissions;

pub use cache::DomainCache;
pub use context::LoaderContext;
pub use domain::{DomainBuilder, TrustDomain};
pub use error::{LoaderError, LoaderResult, PolicyError, PolicyResult};
pub use loader::{ModuleDefiner, ModuleHandle, SecureLoader};
pub use namespace::NamespaceRegistry;
pub use permissions::{EmptyResolver, Permission, PermissionResolver, PermissionSet};
