//! The owning loading context.

use std::fmt;
use std::sync::Arc;

use crate::error::PolicyResult;
use crate::permissions::{EmptyResolver, PermissionResolver, PermissionSet};

/// Identity of a loading context plus its injected policy hook.
///
/// Every trust domain built for this context keeps a reference back to it,
/// so a domain's consumer can always tell which loader produced it.
pub struct LoaderContext {
    name: String,
    resolver: Arc<dyn PermissionResolver>,
}

impl LoaderContext {
    pub fn new(name: impl Into<String>, resolver: Arc<dyn PermissionResolver>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            resolver,
        })
    }

    /// Context with the default empty-grant policy hook.
    pub fn with_default_policy(name: impl Into<String>) -> Arc<Self> {
        Self::new(name, Arc::new(EmptyResolver))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the permissions granted to code from `location`.
    pub fn resolve_permissions(&self, location: &str) -> PolicyResult<PermissionSet> {
        self.resolver.resolve(location)
    }
}

impl fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
