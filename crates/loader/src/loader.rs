//! Provenance-gated module definition entry points.

use std::sync::Arc;

use bytes::Bytes;

use palisade_core::Config;
use palisade_provenance::Provenance;

use crate::cache::DomainCache;
use crate::context::LoaderContext;
use crate::domain::{DomainBuilder, TrustDomain};
use crate::error::{LoaderError, LoaderResult};
use crate::namespace::NamespaceRegistry;
use crate::permissions::{EmptyResolver, PermissionResolver};

/// Opaque result of defining a module.
#[derive(Debug, Clone)]
pub struct ModuleHandle {
    name: Option<String>,
    domain: Option<Arc<TrustDomain>>,
}

impl ModuleHandle {
    pub fn new(name: Option<&str>, domain: Option<&Arc<TrustDomain>>) -> Self {
        Self {
            name: name.map(str::to_string),
            domain: domain.map(Arc::clone),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The trust domain the module was defined under, if its provenance was
    /// known.
    pub fn domain(&self) -> Option<&Arc<TrustDomain>> {
        self.domain.as_ref()
    }
}

/// The bytecode-defining primitive.
///
/// Parsing, linking, and registering module images is outside this crate;
/// the loader hands the raw image plus its resolved trust domain across
/// this seam. Implementations signal malformed images with
/// [`LoaderError::Format`].
pub trait ModuleDefiner: Send + Sync {
    fn define_raw(
        &self,
        name: Option<&str>,
        image: &[u8],
        domain: Option<&Arc<TrustDomain>>,
    ) -> LoaderResult<ModuleHandle>;
}

/// Module loader that binds every defined module to a cached trust domain.
pub struct SecureLoader<D: ModuleDefiner> {
    context: Arc<LoaderContext>,
    cache: DomainCache,
    namespaces: NamespaceRegistry,
    definer: D,
}

impl<D: ModuleDefiner> SecureLoader<D> {
    /// Loader with the default (empty-grant) policy hook and default
    /// configuration.
    pub fn new(name: impl Into<String>, definer: D) -> Self {
        Self::with_resolver(name, definer, Arc::new(EmptyResolver))
    }

    /// Loader with an injected policy hook and default configuration.
    pub fn with_resolver(
        name: impl Into<String>,
        definer: D,
        resolver: Arc<dyn PermissionResolver>,
    ) -> Self {
        let mut config = Config::default_config();
        config.loader.name = name.into();
        Self::from_config(&config, definer, resolver)
    }

    pub fn from_config(
        config: &Config,
        definer: D,
        resolver: Arc<dyn PermissionResolver>,
    ) -> Self {
        let context = LoaderContext::new(config.loader.name.clone(), resolver);
        let builder = DomainBuilder::new(Arc::clone(&context));
        Self {
            cache: DomainCache::with_capacity(builder, config.cache.initial_capacity),
            namespaces: NamespaceRegistry::new(config.loader.reserved_namespaces.clone()),
            context,
            definer,
        }
    }

    /// Define a module from `length` bytes of `source` starting at
    /// `offset`.
    ///
    /// An invalid sub-range is an input-bounds error, reported before any
    /// trust processing happens.
    pub fn define_module(
        &self,
        name: Option<&str>,
        source: &[u8],
        offset: usize,
        length: usize,
        provenance: Option<&Provenance>,
    ) -> LoaderResult<ModuleHandle> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= source.len())
            .ok_or(LoaderError::OutOfRange {
                offset,
                length,
                size: source.len(),
            })?;
        self.define_image(name, &source[offset..end], provenance)
    }

    /// Define a module from a shared buffer.
    pub fn define_module_buffer(
        &self,
        name: Option<&str>,
        buffer: &Bytes,
        provenance: Option<&Provenance>,
    ) -> LoaderResult<ModuleHandle> {
        self.define_image(name, buffer.as_ref(), provenance)
    }

    fn define_image(
        &self,
        name: Option<&str>,
        image: &[u8],
        provenance: Option<&Provenance>,
    ) -> LoaderResult<ModuleHandle> {
        if let Some(name) = name {
            self.namespaces
                .check(name, provenance.and_then(Provenance::signers))?;
        }

        // May populate the domain cache as a side effect.
        let domain = self.cache.get_or_create(provenance)?;
        self.definer.define_raw(name, image, domain.as_ref())
    }

    /// Clear every cached trust domain, e.g. before capturing process
    /// state for a fast restart. Subsequent definitions re-resolve
    /// permissions from scratch.
    pub fn reset_domains(&self) {
        self.cache.reset();
    }

    pub fn domains(&self) -> &DomainCache {
        &self.cache
    }

    pub fn context(&self) -> &Arc<LoaderContext> {
        &self.context
    }
}
