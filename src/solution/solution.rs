use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::execution::{
    ConvInvokeParams, ExecutionContext, FusedInvokeParams, Handle, InvokeParams,
};
use crate::fusion::{FusedProblem, OperatorArgs};
use crate::problem::{
    ConvolutionMode, Direction, OperatorDescriptor, Problem, ProblemVariant, ResolvedInput,
    RunInput, TensorArgumentId, resolve_input,
};
use crate::tensor::Buffer;
use crate::utils::error::KernelPlanError;
use crate::utils::numerics::{check_numerics, check_numerics_enabled};

/// Stable solver identity: a display string referencing the registry, not an
/// owned solver instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolverId(String);

impl SolverId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SolverId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A resolved execution plan: the chosen solver, the problem it solves, the
/// search's time estimate, the minimum workspace any run must provide, and the
/// tuning payload to replay. Created by an external search or deserialized;
/// read-only during execution.
#[derive(Clone, Debug)]
pub struct Solution {
    solver: SolverId,
    problem: ProblemVariant,
    time: f32,
    workspace_required: usize,
    perf_cfg: Option<String>,
}

impl Solution {
    pub fn new(
        solver: SolverId,
        problem: ProblemVariant,
        time: f32,
        workspace_required: usize,
        perf_cfg: Option<String>,
    ) -> Self {
        Self {
            solver,
            problem,
            time,
            workspace_required,
            perf_cfg,
        }
    }

    pub fn solver(&self) -> &SolverId {
        &self.solver
    }

    pub fn problem(&self) -> &ProblemVariant {
        &self.problem
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn workspace_required(&self) -> usize {
        self.workspace_required
    }

    pub fn perf_cfg(&self) -> Option<&str> {
        self.perf_cfg.as_deref()
    }

    /// Execute the plan against caller-supplied buffers. Synchronous: returns
    /// once the invoker has run. Either the whole run completes and the output
    /// buffer is updated, or no work for this call is considered committed.
    pub fn run(
        &self,
        handle: &Handle,
        inputs: &HashMap<TensorArgumentId, RunInput>,
        workspace: Option<&Buffer>,
        workspace_size: usize,
    ) -> Result<(), KernelPlanError> {
        if workspace_size < self.workspace_required {
            return Err(KernelPlanError::InsufficientWorkspace(format!(
                "{} requires at least {} workspace, while {} was provided",
                self.solver, self.workspace_required, workspace_size
            )));
        }

        match &self.problem {
            ProblemVariant::Single(problem) => match problem.operator() {
                OperatorDescriptor::Convolution(_) => {
                    self.run_conv(handle, inputs, workspace, workspace_size, problem)
                }
                OperatorDescriptor::Activation(_) => Err(KernelPlanError::Unsupported(
                    "standalone activation problems are not executable".into(),
                )),
                OperatorDescriptor::Bias(_) => Err(KernelPlanError::Unsupported(
                    "standalone bias problems are not executable".into(),
                )),
            },
            ProblemVariant::Fused(fused) => self.run_fused(handle, inputs, fused),
        }
    }

    fn run_conv(
        &self,
        handle: &Handle,
        inputs: &HashMap<TensorArgumentId, RunInput>,
        workspace: Option<&Buffer>,
        workspace_size: usize,
        problem: &Problem,
    ) -> Result<(), KernelPlanError> {
        let mut x = resolve_input(TensorArgumentId::ConvolutionX, inputs, problem)?;
        let w = resolve_input(TensorArgumentId::ConvolutionW, inputs, problem)?;
        let mut y = resolve_input(TensorArgumentId::ConvolutionY, inputs, problem)?;

        let transpose_mode = matches!(
            problem.operator(),
            OperatorDescriptor::Convolution(conv) if conv.mode == ConvolutionMode::Transpose
        );

        // Transpose is applied before the backward shape check and numerics.
        let mut problem = if transpose_mode {
            Self::transpose(problem, &mut x, &w, &mut y)
        } else {
            problem.clone()
        };

        problem.register_tensor_descriptor(TensorArgumentId::ConvolutionX, x.descriptor.clone());
        problem.register_tensor_descriptor(TensorArgumentId::ConvolutionW, w.descriptor.clone());
        problem.register_tensor_descriptor(TensorArgumentId::ConvolutionY, y.descriptor.clone());

        let conv = match problem.operator() {
            OperatorDescriptor::Convolution(conv) => conv.clone(),
            _ => unreachable!("run_conv dispatched on a convolution operator"),
        };
        let direction = problem.direction();

        if direction == Direction::Backward && y.descriptor.dims()[1] != w.descriptor.dims()[0] {
            return Err(KernelPlanError::InvalidShape(format!(
                "backward output channels {} do not match weight output channels {}",
                y.descriptor.dims()[1],
                w.descriptor.dims()[0]
            )));
        }

        if check_numerics_enabled() {
            if direction != Direction::Backward {
                check_numerics("ConvolutionX", &x.descriptor, &x.buffer)?;
            }
            if direction != Direction::BackwardWeights {
                check_numerics("ConvolutionW", &w.descriptor, &w.buffer)?;
            }
            if direction != Direction::Forward {
                check_numerics("ConvolutionY", &y.descriptor, &y.buffer)?;
            }
        }

        Problem::validate_group_count(&x.descriptor, &w.descriptor, &conv)?;

        let make_params = |input: &ResolvedInput,
                           weights: &ResolvedInput,
                           output: &ResolvedInput,
                           fp16_alt: bool| ConvInvokeParams {
            in_desc: input.descriptor.clone(),
            in_buf: input.buffer.clone(),
            weights_desc: weights.descriptor.clone(),
            weights_buf: weights.buffer.clone(),
            out_desc: output.descriptor.clone(),
            out_buf: output.buffer.clone(),
            workspace: workspace.cloned(),
            workspace_size,
            fp16_alt,
        };

        let invoke_params = match direction {
            Direction::Forward => {
                InvokeParams::Forward(make_params(&x, &w, &y, conv.fp16_alt.fwd))
            }
            Direction::Backward => {
                InvokeParams::Backward(make_params(&y, &w, &x, conv.fp16_alt.bwd))
            }
            Direction::BackwardWeights => {
                InvokeParams::BackwardWeights(make_params(&y, &x, &w, conv.fp16_alt.wrw))
            }
        };

        let net_cfg = problem.network_config(&conv, &x.descriptor, &w.descriptor, &y.descriptor);

        let (invoker, _built) =
            handle.find_or_build_invoker(&net_cfg, self.solver.as_str(), || {
                let mut ctx = ExecutionContext::new(handle);
                problem.setup_floats(&mut ctx);

                let solver = handle.solvers().get(self.solver.as_str())?;
                let construction = solver.find_solution(
                    &ctx,
                    &problem,
                    handle.db(),
                    &invoke_params,
                    self.perf_cfg.as_deref().unwrap_or(""),
                )?;

                Ok(handle
                    .prepare_invoker(&construction.invoker_factory, &construction.construction_params))
            })?;

        invoker.invoke(handle, &invoke_params)?;

        if check_numerics_enabled() {
            match direction {
                Direction::Forward => check_numerics("ConvolutionY", &y.descriptor, &y.buffer)?,
                Direction::Backward => check_numerics("ConvolutionX", &x.descriptor, &x.buffer)?,
                Direction::BackwardWeights => {
                    check_numerics("ConvolutionW", &w.descriptor, &w.buffer)?
                }
            }
        }

        Ok(())
    }

    fn run_fused(
        &self,
        handle: &Handle,
        inputs: &HashMap<TensorArgumentId, RunInput>,
        fused: &FusedProblem,
    ) -> Result<(), KernelPlanError> {
        let buffer_getter = |id: TensorArgumentId, fixed: &crate::tensor::TensorDesc| {
            let found = inputs.get(&id).ok_or_else(|| {
                KernelPlanError::MissingArgument(format!(
                    "Fused run is missing the {} tensor argument",
                    id.label()
                ))
            })?;
            if let Some(supplied) = &found.descriptor {
                if supplied != fixed {
                    return Err(KernelPlanError::Unsupported(
                        "Providing new descriptors for a fused solution is not supported".into(),
                    ));
                }
            }
            Ok(found.buffer.clone())
        };

        let mut op_args = OperatorArgs::default();
        fused.bind_arguments(buffer_getter, &mut op_args)?;
        let invoke_params = InvokeParams::Fused(FusedInvokeParams { op_args });

        let net_cfg = fused.network_config();

        let (invoker, _built) =
            handle.find_or_build_invoker(&net_cfg, self.solver.as_str(), || {
                let ctx = ExecutionContext::new(handle);
                let solver = handle.solvers().get(self.solver.as_str())?;
                let construction = solver.find_fused_solution(
                    &ctx,
                    self.perf_cfg.as_deref().unwrap_or(""),
                    fused,
                    &invoke_params,
                )?;

                Ok(handle
                    .prepare_invoker(&construction.invoker_factory, &construction.construction_params))
            })?;

        invoker.invoke(handle, &invoke_params)
    }

    /// Swap the X/Y run inputs by value and rebuild the problem in its
    /// non-transposed form, carrying the resolved descriptors across under
    /// their canonical ids. Pure relabeling, no data moves.
    fn transpose(
        problem: &Problem,
        x: &mut ResolvedInput,
        w: &ResolvedInput,
        y: &mut ResolvedInput,
    ) -> Problem {
        let mut transposed = problem.make_transposed();

        std::mem::swap(x, y);

        transposed.register_tensor_descriptor(TensorArgumentId::ConvolutionX, x.descriptor.clone());
        transposed.register_tensor_descriptor(TensorArgumentId::ConvolutionW, w.descriptor.clone());
        transposed.register_tensor_descriptor(TensorArgumentId::ConvolutionY, y.descriptor.clone());

        transposed
    }
}
