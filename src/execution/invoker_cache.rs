use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::execution::invoker::Invoker;
use crate::problem::NetworkConfig;
use crate::utils::error::KernelPlanError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub network_config: NetworkConfig,
    pub solver: String,
}

#[derive(Default)]
struct CacheSlot {
    invoker: Mutex<Option<Arc<Invoker>>>,
}

/// Handle-owned mapping from (signature, solver) to a prepared invoker.
///
/// Concurrent misses on the same key serialize on that key's slot lock, so the
/// expensive build runs at most once per key while other keys stay contention
/// free. Entries are never replaced once built.
#[derive(Default)]
pub struct InvokerCache {
    slots: Mutex<HashMap<CacheKey, Arc<CacheSlot>>>,
}

impl InvokerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &CacheKey) -> Arc<CacheSlot> {
        let mut slots = self.slots.lock().expect("invoker cache lock poisoned");
        slots.entry(key.clone()).or_default().clone()
    }

    /// Fast path: return the cached invoker if one was already built.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Invoker>> {
        let slot = self.slot(key);
        let built = slot.invoker.lock().expect("cache slot lock poisoned");
        built.clone()
    }

    /// Returns the cached invoker, building it via `build` on a miss. The
    /// second element reports whether this call performed the build. A failed
    /// build leaves the slot empty and the error propagates to the caller.
    pub fn get_or_build<F>(
        &self,
        key: &CacheKey,
        build: F,
    ) -> Result<(Arc<Invoker>, bool), KernelPlanError>
    where
        F: FnOnce() -> Result<Arc<Invoker>, KernelPlanError>,
    {
        let slot = self.slot(key);
        let mut built = slot.invoker.lock().expect("cache slot lock poisoned");
        if let Some(invoker) = built.as_ref() {
            return Ok((invoker.clone(), false));
        }
        let invoker = build()?;
        *built = Some(invoker.clone());
        Ok((invoker, true))
    }

    /// Direct insertion, first write wins.
    pub fn insert(&self, key: CacheKey, invoker: Arc<Invoker>) {
        let slot = self.slot(&key);
        let mut built = slot.invoker.lock().expect("cache slot lock poisoned");
        if built.is_none() {
            *built = Some(invoker);
        }
    }

    /// Number of keys holding a built invoker.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().expect("invoker cache lock poisoned");
        slots
            .values()
            .filter(|slot| {
                slot.invoker
                    .lock()
                    .expect("cache slot lock poisoned")
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
