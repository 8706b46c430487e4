use std::sync::Arc;

use crate::execution::invoker::{ConstructionParams, Invoker, InvokerFactory};
use crate::execution::invoker_cache::{CacheKey, InvokerCache};
use crate::problem::NetworkConfig;
use crate::solver::{SolverDb, SolverRegistry};
use crate::utils::error::KernelPlanError;

/// The execution handle: owns the invoker cache, the solver registry and the
/// tuning database consulted on cache misses. One handle per device context;
/// cached invokers live as long as the handle.
pub struct Handle {
    solvers: SolverRegistry,
    cache: InvokerCache,
    db: SolverDb,
}

impl Handle {
    pub fn new(solvers: SolverRegistry) -> Self {
        Self {
            solvers,
            cache: InvokerCache::new(),
            db: SolverDb::new(),
        }
    }

    /// Handle preloaded with the reference CPU solvers.
    pub fn with_reference_solvers() -> Self {
        Self::new(SolverRegistry::with_reference_solvers())
    }

    pub fn solvers(&self) -> &SolverRegistry {
        &self.solvers
    }

    pub fn db(&self) -> &SolverDb {
        &self.db
    }

    pub fn get_invoker(
        &self,
        network_config: &NetworkConfig,
        solver: &str,
    ) -> Option<Arc<Invoker>> {
        self.cache.get(&CacheKey {
            network_config: network_config.clone(),
            solver: solver.to_string(),
        })
    }

    pub fn prepare_invoker(
        &self,
        factory: &InvokerFactory,
        params: &ConstructionParams,
    ) -> Arc<Invoker> {
        Arc::new(factory(params))
    }

    pub fn register_invoker(
        &self,
        invoker: Arc<Invoker>,
        network_config: &NetworkConfig,
        solver: &str,
    ) {
        self.cache.insert(
            CacheKey {
                network_config: network_config.clone(),
                solver: solver.to_string(),
            },
            invoker,
        );
    }

    /// Single-flight resolve: the fast path returns the cached invoker, a miss
    /// runs `build` exactly once for this key and registers its result.
    pub fn find_or_build_invoker<F>(
        &self,
        network_config: &NetworkConfig,
        solver: &str,
        build: F,
    ) -> Result<(Arc<Invoker>, bool), KernelPlanError>
    where
        F: FnOnce() -> Result<Arc<Invoker>, KernelPlanError>,
    {
        self.cache.get_or_build(
            &CacheKey {
                network_config: network_config.clone(),
                solver: solver.to_string(),
            },
            build,
        )
    }

    pub fn cached_invoker_count(&self) -> usize {
        self.cache.len()
    }
}
