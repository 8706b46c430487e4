mod fused_problem;
pub use fused_problem::{BoundArg, FusedArg, FusedOperator, FusedProblem, OperatorArgs};
