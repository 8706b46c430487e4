use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::execution::ExecutionContext;
use crate::fusion::FusedProblem;
use crate::problem::argument::TensorArgumentId;
use crate::problem::direction::Direction;
use crate::problem::operator::{ConvolutionDescriptor, ConvolutionMode, OperatorDescriptor};
use crate::tensor::TensorDesc;
use crate::utils::error::KernelPlanError;

/// Canonical cache key derived from a resolved problem's shapes, types and
/// operator parameters. Never persisted outside the invoker cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkConfig(pub String);

impl NetworkConfig {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single-operator problem: one operator descriptor, a direction, and the
/// tensor descriptors registered so far. Descriptors left unregistered here
/// must arrive with the run inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    operator: OperatorDescriptor,
    direction: Direction,
    tensors: HashMap<TensorArgumentId, TensorDesc>,
}

impl Problem {
    pub fn new(operator: OperatorDescriptor, direction: Direction) -> Self {
        Self {
            operator,
            direction,
            tensors: HashMap::new(),
        }
    }

    pub fn operator(&self) -> &OperatorDescriptor {
        &self.operator
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn register_tensor_descriptor(&mut self, id: TensorArgumentId, desc: TensorDesc) {
        self.tensors.insert(id, desc);
    }

    pub fn tensor_descriptor(&self, id: TensorArgumentId) -> Option<&TensorDesc> {
        self.tensors.get(&id)
    }

    /// Structural transpose: flips forward/backward, clears the transpose
    /// convolution mode and swaps the registered X/Y descriptor entries.
    /// Pure relabeling, no tensor data is touched.
    pub fn make_transposed(&self) -> Self {
        let mut transposed = self.clone();

        if let OperatorDescriptor::Convolution(conv) = &mut transposed.operator {
            conv.mode = ConvolutionMode::Normal;
        }

        transposed.direction = match self.direction {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::BackwardWeights => Direction::BackwardWeights,
        };

        let x = transposed.tensors.remove(&TensorArgumentId::ConvolutionX);
        let y = transposed.tensors.remove(&TensorArgumentId::ConvolutionY);
        if let Some(desc) = y {
            transposed
                .tensors
                .insert(TensorArgumentId::ConvolutionX, desc);
        }
        if let Some(desc) = x {
            transposed
                .tensors
                .insert(TensorArgumentId::ConvolutionY, desc);
        }

        transposed
    }

    /// Group topology must line up before invoke params are built: the weight
    /// output channels split evenly over groups and the input channels match
    /// the per-group weight input channels.
    pub fn validate_group_count(
        x: &TensorDesc,
        w: &TensorDesc,
        conv: &ConvolutionDescriptor,
    ) -> Result<(), KernelPlanError> {
        let group = conv.group_count;
        if group == 0 {
            return Err(KernelPlanError::InvalidShape(
                "group count must be at least 1".into(),
            ));
        }
        if w.dims()[0] % group != 0 {
            return Err(KernelPlanError::InvalidShape(format!(
                "weight output channels {} not divisible by group count {}",
                w.dims()[0],
                group
            )));
        }
        if x.dims()[1] != w.dims()[1] * group {
            return Err(KernelPlanError::InvalidShape(format!(
                "input channels {} do not match weight channels {} x group count {}",
                x.dims()[1],
                w.dims()[1],
                group
            )));
        }
        Ok(())
    }

    /// Numeric-precision policy hook: the problem tells the execution context
    /// which data type the search should compile for. The primary input
    /// descriptor decides; any other registered descriptor is the fallback.
    pub fn setup_floats(&self, ctx: &mut ExecutionContext<'_>) {
        let dtype = self
            .tensors
            .get(&TensorArgumentId::ConvolutionX)
            .or_else(|| self.tensors.values().next())
            .map(|desc| desc.data_type());
        ctx.data_type = dtype;
    }

    /// Canonical signature of a resolved convolution problem. Deterministic in
    /// the shapes, data types, direction and convolution parameters; pure.
    pub fn network_config(
        &self,
        conv: &ConvolutionDescriptor,
        x: &TensorDesc,
        w: &TensorDesc,
        y: &TensorDesc,
    ) -> NetworkConfig {
        let fmt_dims = |desc: &TensorDesc| {
            desc.dims()
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("x")
        };
        let fmt_vec = |v: &[usize]| {
            v.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("x")
        };

        NetworkConfig(format!(
            "conv{}-{}-{}-in{}-w{}-out{}-p{}-s{}-d{}-g{}",
            conv.spatial_rank(),
            x.data_type().tag(),
            self.direction.tag(),
            fmt_dims(x),
            fmt_dims(w),
            fmt_dims(y),
            fmt_vec(&conv.pads),
            fmt_vec(&conv.strides),
            fmt_vec(&conv.dilations),
            conv.group_count,
        ))
    }
}

/// The problem a solution binds to: a single operator or a fused graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProblemVariant {
    Single(Problem),
    Fused(FusedProblem),
}
