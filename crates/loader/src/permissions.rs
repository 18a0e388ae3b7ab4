//! Permissions and the overridable permission-resolution hook.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PolicyResult;

/// A single grant: a named privilege over a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Privilege name, e.g. `fs.read`
    pub name: String,
    /// Resource the privilege applies to, e.g. `/opt/data`
    pub target: String,
}

impl Permission {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// The collection of grants bound to a trust domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    grants: HashSet<Permission>,
}

impl PermissionSet {
    /// The set with no grants.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, permission: Permission) {
        self.grants.insert(permission);
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.grants.contains(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.grants.iter()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

/// Overridable policy hook consulted on each trust-domain cache miss.
///
/// Implementations may consult a policy engine and block on files or the
/// network; the cache never holds a map lock while this runs. The hook must
/// be deterministic for a given location between cache resets.
pub trait PermissionResolver: Send + Sync {
    fn resolve(&self, location: &str) -> PolicyResult<PermissionSet>;
}

/// Default hook: grants nothing, deferring real permission binding to the
/// domain's consumer.
#[derive(Debug, Default)]
pub struct EmptyResolver;

impl PermissionResolver for EmptyResolver {
    fn resolve(&self, _location: &str) -> PolicyResult<PermissionSet> {
        Ok(PermissionSet::empty())
    }
}
