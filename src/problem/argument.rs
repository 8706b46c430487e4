use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::problem::problem::Problem;
use crate::tensor::{Buffer, TensorDesc};
use crate::utils::error::KernelPlanError;

/// Semantic tensor-argument roles. Fixed enumeration shared between the engine
/// and its callers; used purely as mapping keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TensorArgumentId {
    ConvolutionX,
    ConvolutionW,
    ConvolutionY,
    ActivationX,
    ActivationY,
    BiasB,
    BiasX,
    BiasY,
}

impl TensorArgumentId {
    pub fn label(&self) -> &'static str {
        match self {
            TensorArgumentId::ConvolutionX => "ConvolutionX",
            TensorArgumentId::ConvolutionW => "ConvolutionW",
            TensorArgumentId::ConvolutionY => "ConvolutionY",
            TensorArgumentId::ActivationX => "ActivationX",
            TensorArgumentId::ActivationY => "ActivationY",
            TensorArgumentId::BiasB => "BiasB",
            TensorArgumentId::BiasX => "BiasX",
            TensorArgumentId::BiasY => "BiasY",
        }
    }
}

/// A caller-supplied buffer, optionally paired with a descriptor. When the
/// descriptor is absent the problem must carry one for the same argument id.
#[derive(Clone, Debug)]
pub struct RunInput {
    pub descriptor: Option<TensorDesc>,
    pub buffer: Buffer,
}

impl RunInput {
    pub fn new(descriptor: TensorDesc, buffer: Buffer) -> Self {
        Self {
            descriptor: Some(descriptor),
            buffer,
        }
    }

    pub fn buffer_only(buffer: Buffer) -> Self {
        Self {
            descriptor: None,
            buffer,
        }
    }
}

/// A run input whose descriptor has been resolved against the problem.
#[derive(Clone, Debug)]
pub struct ResolvedInput {
    pub descriptor: TensorDesc,
    pub buffer: Buffer,
}

/// Look up `id` in the supplied inputs, filling a missing descriptor from the
/// problem's registered one. Fails if neither side provides a descriptor.
pub fn resolve_input(
    id: TensorArgumentId,
    inputs: &HashMap<TensorArgumentId, RunInput>,
    problem: &Problem,
) -> Result<ResolvedInput, KernelPlanError> {
    let found = inputs.get(&id).ok_or_else(|| {
        KernelPlanError::MissingArgument(format!(
            "Run is missing the {} tensor argument",
            id.label()
        ))
    })?;

    let descriptor = match &found.descriptor {
        Some(desc) => desc.clone(),
        None => problem
            .tensor_descriptor(id)
            .cloned()
            .ok_or_else(|| {
                KernelPlanError::MissingArgument(format!(
                    "Problem is missing the {} tensor descriptor",
                    id.label()
                ))
            })?,
    };

    Ok(ResolvedInput {
        descriptor,
        buffer: found.buffer.clone(),
    })
}
