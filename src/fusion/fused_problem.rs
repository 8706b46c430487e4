use serde::{Deserialize, Serialize};

use crate::problem::{NetworkConfig, OperatorDescriptor, TensorArgumentId};
use crate::tensor::{Buffer, TensorDesc};
use crate::utils::error::KernelPlanError;

/// A fused-plan argument: its semantic id and the descriptor fixed at plan
/// construction. Fused plans are immutable with respect to shape afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusedArg {
    pub id: TensorArgumentId,
    pub descriptor: TensorDesc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusedOperator {
    pub operator: OperatorDescriptor,
    pub args: Vec<FusedArg>,
}

/// An ordered composition of operators executed as one plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusedProblem {
    operators: Vec<FusedOperator>,
}

/// Transient per-call binding of fused-plan arguments to caller buffers.
/// Lives for exactly one run.
#[derive(Clone, Debug, Default)]
pub struct OperatorArgs {
    pub bound: Vec<Vec<BoundArg>>,
}

#[derive(Clone, Debug)]
pub struct BoundArg {
    pub id: TensorArgumentId,
    pub descriptor: TensorDesc,
    pub buffer: Buffer,
}

impl FusedProblem {
    pub fn new(operators: Vec<FusedOperator>) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &[FusedOperator] {
        &self.operators
    }

    /// Walk the operator graph and bind every fixed argument to a caller
    /// buffer via `buffer_getter`. The getter decides presence/consistency;
    /// bindings accumulate into `op_args`.
    pub fn bind_arguments<F>(
        &self,
        mut buffer_getter: F,
        op_args: &mut OperatorArgs,
    ) -> Result<(), KernelPlanError>
    where
        F: FnMut(TensorArgumentId, &TensorDesc) -> Result<Buffer, KernelPlanError>,
    {
        for op in &self.operators {
            let mut bound = Vec::with_capacity(op.args.len());
            for arg in &op.args {
                let buffer = buffer_getter(arg.id, &arg.descriptor)?;
                bound.push(BoundArg {
                    id: arg.id,
                    descriptor: arg.descriptor.clone(),
                    buffer,
                });
            }
            op_args.bound.push(bound);
        }
        Ok(())
    }

    /// Canonical signature of the fused plan: the concatenated sub-operator
    /// signatures over their fixed descriptors. Pure.
    pub fn network_config(&self) -> NetworkConfig {
        let mut parts = Vec::with_capacity(self.operators.len());
        for op in &self.operators {
            let args = op
                .args
                .iter()
                .map(|arg| {
                    let dims = arg
                        .descriptor
                        .dims()
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join("x");
                    format!("{}:{}{}", arg.id.label(), arg.descriptor.data_type().tag(), dims)
                })
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("{}[{}]", op.operator.kind_tag(), args));
        }
        NetworkConfig(format!("fused-{}", parts.join("+")))
    }
}
