//! kernelplan - Compute-kernel dispatch and execution-plan caching
//!
//! Given a resolved execution plan (a solver identity, the problem it solves
//! and an optional tuning payload), this library validates arguments, builds
//! or replays a cached invoker keyed by the problem's canonical signature, and
//! runs it against caller-supplied buffers. Plans serialize with a versioned
//! header so a choice made once can be shipped and replayed without
//! re-searching.

mod execution;

mod fusion;

mod problem;

mod solution;

mod solver;

mod tensor;

mod utils;

pub use execution::{
    CacheKey, ConstructionParams, ConvInvokeParams, ExecutionContext, FusedInvokeParams, Handle,
    InvokeParams, Invoker, InvokerCache, InvokerFactory,
};
pub use fusion::{BoundArg, FusedArg, FusedOperator, FusedProblem, OperatorArgs};
pub use problem::{
    ActivationDescriptor, ActivationMode, BiasDescriptor, ConvolutionDescriptor, ConvolutionMode,
    Direction, Fp16AltAttribute, NetworkConfig, OperatorDescriptor, Problem, ProblemVariant,
    ResolvedInput, RunInput, TensorArgumentId, resolve_input,
};
pub use solution::{SerializationMetadata, Solution, SolverId};
pub use solver::{
    ConvDirectNaiveBwd, ConvDirectNaiveFwd, ConvDirectNaiveWrw, Solver, SolverConstruction,
    SolverDb, SolverRegistry, naive_cpu,
};
pub use tensor::{Buffer, DataType, TensorDesc};
pub use utils::error::KernelPlanError;
pub use utils::numerics::{check_numerics, check_numerics_enabled, set_check_numerics};
