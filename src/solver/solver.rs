use crate::execution::{ConstructionParams, ExecutionContext, InvokeParams, InvokerFactory};
use crate::fusion::FusedProblem;
use crate::problem::Problem;
use crate::solver::db::SolverDb;
use crate::utils::error::KernelPlanError;

/// A concrete construction returned by a solver's search: the kernel arguments
/// plus the factory that turns them into an executable invoker.
pub struct SolverConstruction {
    pub construction_params: ConstructionParams,
    pub invoker_factory: InvokerFactory,
}

impl std::fmt::Debug for SolverConstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConstruction")
            .field("construction_params", &self.construction_params)
            .finish_non_exhaustive()
    }
}

/// The solver boundary. Implementations own the actual kernel selection and
/// (possibly expensive) search; this crate only orchestrates when they run.
pub trait Solver: Send + Sync {
    /// Stable display name; doubles as the registry and cache identity.
    fn name(&self) -> &'static str;

    fn is_applicable(&self, ctx: &ExecutionContext<'_>, problem: &Problem) -> bool;

    /// Produce a construction for a resolved single-operator problem.
    /// `perf_cfg` is the replayed tuning payload, empty when none was
    /// persisted. Failure here is fatal to the run; no retry happens.
    fn find_solution(
        &self,
        ctx: &ExecutionContext<'_>,
        problem: &Problem,
        db: &SolverDb,
        invoke_params: &InvokeParams,
        perf_cfg: &str,
    ) -> Result<SolverConstruction, KernelPlanError>;

    /// Produce a construction for a fused plan with already-bound arguments.
    fn find_fused_solution(
        &self,
        _ctx: &ExecutionContext<'_>,
        _perf_cfg: &str,
        _fused: &FusedProblem,
        _invoke_params: &InvokeParams,
    ) -> Result<SolverConstruction, KernelPlanError> {
        Err(KernelPlanError::Unsupported(format!(
            "{} does not support fused plans",
            self.name()
        )))
    }
}
