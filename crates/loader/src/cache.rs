//! The trust-domain cache.
//!
//! Maps origin keys to trust domains with single-flight construction per
//! key: concurrent requests for one never-seen origin elect a leader that
//! runs the builder while followers block on its flight cell, and requests
//! for unrelated origins only ever contend at map-shard granularity. The
//! policy hook always runs with no shard lock held.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};

use palisade_provenance::{OriginKey, Provenance};

use crate::domain::{DomainBuilder, TrustDomain};
use crate::error::PolicyResult;

/// Outcome of one in-flight construction, shared between the leader and the
/// followers that arrived while it ran.
enum FlightState {
    Building,
    Done(Arc<TrustDomain>),
    Failed,
}

struct Flight {
    state: Mutex<FlightState>,
    done: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Building),
            done: Condvar::new(),
        }
    }

    /// Block until the leader finishes. `None` means the leader failed and
    /// already removed the entry; the caller should retry the lookup.
    fn wait(&self) -> Option<Arc<TrustDomain>> {
        let mut state = self.state.lock();
        while matches!(*state, FlightState::Building) {
            self.done.wait(&mut state);
        }
        match &*state {
            FlightState::Done(domain) => Some(Arc::clone(domain)),
            FlightState::Failed => None,
            FlightState::Building => unreachable!("woken while still building"),
        }
    }

    fn finish(&self, outcome: Option<Arc<TrustDomain>>) {
        let mut state = self.state.lock();
        *state = match outcome {
            Some(domain) => FlightState::Done(domain),
            None => FlightState::Failed,
        };
        self.done.notify_all();
    }
}

#[derive(Clone)]
enum Slot {
    Ready(Arc<TrustDomain>),
    Pending(Arc<Flight>),
}

/// Concurrent, loader-scoped map from origin key to trust domain.
///
/// Invariant: once a lookup for a key has returned a domain and no reset
/// has intervened, every later lookup for that key returns the same
/// `Arc<TrustDomain>`.
pub struct DomainCache {
    entries: DashMap<OriginKey, Slot>,
    builder: DomainBuilder,
}

impl DomainCache {
    pub fn new(builder: DomainBuilder) -> Self {
        Self::with_capacity(builder, 16)
    }

    pub fn with_capacity(builder: DomainBuilder, capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            builder,
        }
    }

    /// Return the shared trust domain for `provenance`, building it on
    /// first use.
    ///
    /// A `None` descriptor, or one without an origin location, resolves to
    /// `Ok(None)` without touching the map. A failed construction installs
    /// nothing, so a later call for the same origin retries it.
    pub fn get_or_create(
        &self,
        provenance: Option<&Provenance>,
    ) -> PolicyResult<Option<Arc<TrustDomain>>> {
        let Some(provenance) = provenance else {
            return Ok(None);
        };
        if provenance.location().is_none() {
            return Ok(None);
        }

        let key = OriginKey::derive(provenance);
        loop {
            let flight = match self.entries.entry(key.clone()) {
                Entry::Occupied(entry) => {
                    let slot = entry.get().clone();
                    drop(entry);
                    match slot {
                        Slot::Ready(domain) => return Ok(Some(domain)),
                        Slot::Pending(flight) => match flight.wait() {
                            Some(domain) => return Ok(Some(domain)),
                            // The leader failed; its entry is gone. Take over.
                            None => continue,
                        },
                    }
                }
                Entry::Vacant(entry) => {
                    let flight = Arc::new(Flight::new());
                    entry.insert(Slot::Pending(Arc::clone(&flight)));
                    flight
                }
            };

            return self.build_and_install(&key, provenance, flight).map(Some);
        }
    }

    /// Leader path: run the builder with no shard lock held, then publish
    /// the outcome to the map and to any waiting followers.
    fn build_and_install(
        &self,
        key: &OriginKey,
        provenance: &Provenance,
        flight: Arc<Flight>,
    ) -> PolicyResult<Arc<TrustDomain>> {
        match self.builder.build(provenance) {
            Ok(domain) => {
                let winner = self.install(key, domain);
                flight.finish(Some(Arc::clone(&winner)));
                tracing::debug!(
                    origin = provenance.location_no_fragment().unwrap_or(""),
                    "trust domain installed"
                );
                Ok(winner)
            }
            Err(err) => {
                // Remove only our own pending slot; the key must not stay
                // poisoned for the next caller.
                self.entries.remove_if(key, |_, slot| {
                    matches!(slot, Slot::Pending(f) if Arc::ptr_eq(f, &flight))
                });
                flight.finish(None);
                tracing::debug!(
                    origin = provenance.location_no_fragment().unwrap_or(""),
                    error = %err,
                    "trust domain construction failed"
                );
                Err(err)
            }
        }
    }

    /// First installed success wins: a fresh domain replaces a pending slot
    /// or fills a vacancy, but never displaces a domain that other callers
    /// may already share.
    fn install(&self, key: &OriginKey, domain: Arc<TrustDomain>) -> Arc<TrustDomain> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if let Slot::Ready(existing) = entry.get() {
                    Arc::clone(existing)
                } else {
                    entry.insert(Slot::Ready(Arc::clone(&domain)));
                    domain
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Slot::Ready(Arc::clone(&domain)));
                domain
            }
        }
    }

    /// Drop every cached domain.
    ///
    /// Administrative operation for process-state-capture checkpoints, not
    /// the hot path; a lookup racing with the reset may still observe or
    /// re-install a pre-reset domain.
    pub fn reset(&self) {
        self.entries.clear();
        tracing::debug!("trust-domain cache cleared");
    }

    /// Number of origins currently cached, settled or in flight.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
