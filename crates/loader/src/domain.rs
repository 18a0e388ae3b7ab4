//! Trust domains and their builder.

use std::sync::Arc;

use palisade_provenance::Provenance;

use crate::context::LoaderContext;
use crate::error::PolicyResult;
use crate::permissions::{Permission, PermissionSet};

/// Immutable access-control domain for code from one origin.
///
/// Built lazily on the first definition from an origin, then shared by
/// reference among every module that resolves to the same origin key.
#[derive(Debug)]
pub struct TrustDomain {
    provenance: Provenance,
    permissions: PermissionSet,
    context: Arc<LoaderContext>,
}

impl TrustDomain {
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// The loading context that owns this domain.
    pub fn context(&self) -> &Arc<LoaderContext> {
        &self.context
    }

    /// Whether the statically bound permission set contains `permission`.
    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}

/// Builds trust domains by consulting the context's policy hook.
///
/// Building is deterministic and side-effect-free for a given descriptor,
/// so two racing builds for the same origin produce interchangeable
/// domains and the cache may keep either.
#[derive(Debug, Clone)]
pub struct DomainBuilder {
    context: Arc<LoaderContext>,
}

impl DomainBuilder {
    pub fn new(context: Arc<LoaderContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<LoaderContext> {
        &self.context
    }

    /// Build the domain for a descriptor. Fails only if the policy hook
    /// fails; the failure is the caller's to surface.
    pub fn build(&self, provenance: &Provenance) -> PolicyResult<Arc<TrustDomain>> {
        let permissions = match provenance.location() {
            Some(location) => self.context.resolve_permissions(location)?,
            None => PermissionSet::empty(),
        };

        Ok(Arc::new(TrustDomain {
            provenance: provenance.clone(),
            permissions,
            context: Arc::clone(&self.context),
        }))
    }
}
