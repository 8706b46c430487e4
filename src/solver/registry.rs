use std::collections::HashMap;
use std::sync::Arc;

use crate::solver::conv_direct::{ConvDirectNaiveBwd, ConvDirectNaiveFwd, ConvDirectNaiveWrw};
use crate::solver::solver::Solver;
use crate::utils::error::KernelPlanError;

/// Name-keyed registry of known solvers. Solution records reference solvers by
/// display name; the registry resolves that reference at run time.
#[derive(Default)]
pub struct SolverRegistry {
    solvers: HashMap<&'static str, Arc<dyn Solver>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the naive CPU convolution solvers.
    pub fn with_reference_solvers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ConvDirectNaiveFwd));
        registry.register(Arc::new(ConvDirectNaiveBwd));
        registry.register(Arc::new(ConvDirectNaiveWrw));
        registry
    }

    pub fn register(&mut self, solver: Arc<dyn Solver>) {
        self.solvers.insert(solver.name(), solver);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Solver>, KernelPlanError> {
        self.solvers.get(name).cloned().ok_or_else(|| {
            KernelPlanError::Unsupported(format!("Unknown solver: {}", name))
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.solvers.keys().copied().collect()
    }
}
