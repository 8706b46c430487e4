use crate::execution::{
    ConstructionParams, ConvInvokeParams, ExecutionContext, InvokeParams, Invoker,
};
use crate::problem::{ConvolutionDescriptor, Direction, OperatorDescriptor, Problem};
use crate::solver::db::SolverDb;
use crate::solver::naive_cpu::{ConvGeometry, conv_bwd_data, conv_fwd, conv_wrw};
use crate::solver::solver::{Solver, SolverConstruction};
use crate::tensor::DataType;
use crate::utils::error::KernelPlanError;

/// Naive direct-convolution reference solvers: single-threaded CPU loops over
/// 4D NCHW f32 tensors. No workspace, no search; tuning payloads are recorded
/// but do not change the arithmetic.
pub struct ConvDirectNaiveFwd;
pub struct ConvDirectNaiveBwd;
pub struct ConvDirectNaiveWrw;

fn geometry(conv: &ConvolutionDescriptor) -> ConvGeometry {
    ConvGeometry {
        pads: conv.pads.clone(),
        strides: conv.strides.clone(),
        dilations: conv.dilations.clone(),
        group: conv.group_count,
    }
}

fn applicable(ctx: &ExecutionContext<'_>, problem: &Problem, direction: Direction) -> bool {
    if problem.direction() != direction {
        return false;
    }
    if ctx.data_type.is_some_and(|dt| dt != DataType::F32) {
        return false;
    }
    match problem.operator() {
        OperatorDescriptor::Convolution(conv) => conv.spatial_rank() == 2,
        _ => false,
    }
}

fn conv_params<'a>(
    invoke_params: &'a InvokeParams,
    solver: &str,
) -> Result<&'a ConvInvokeParams, KernelPlanError> {
    invoke_params.conv().ok_or_else(|| {
        KernelPlanError::Solver(format!(
            "{} was handed fused invoke params",
            solver
        ))
    })
}

// Tuning: replay the persisted payload when present, otherwise consult the db.
fn tuning_for(
    db: &SolverDb,
    signature: &str,
    solver: &str,
    perf_cfg: &str,
) -> Option<String> {
    if !perf_cfg.is_empty() {
        return Some(perf_cfg.to_string());
    }
    db.find(signature, solver)
}

fn params_signature(p: &ConvInvokeParams) -> String {
    let fmt = |dims: &[usize]| {
        dims.iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("x")
    };
    format!(
        "in{}-w{}-out{}",
        fmt(p.in_desc.dims()),
        fmt(p.weights_desc.dims()),
        fmt(p.out_desc.dims())
    )
}

fn extract_conv<'a>(
    problem: &'a Problem,
    solver: &str,
) -> Result<&'a ConvolutionDescriptor, KernelPlanError> {
    match problem.operator() {
        OperatorDescriptor::Convolution(conv) => Ok(conv),
        other => Err(KernelPlanError::Solver(format!(
            "{} cannot solve a {} problem",
            solver,
            other.kind_tag()
        ))),
    }
}

impl Solver for ConvDirectNaiveFwd {
    fn name(&self) -> &'static str {
        "ConvDirectNaiveFwd"
    }

    fn is_applicable(&self, ctx: &ExecutionContext<'_>, problem: &Problem) -> bool {
        applicable(ctx, problem, Direction::Forward)
    }

    fn find_solution(
        &self,
        _ctx: &ExecutionContext<'_>,
        problem: &Problem,
        db: &SolverDb,
        invoke_params: &InvokeParams,
        perf_cfg: &str,
    ) -> Result<SolverConstruction, KernelPlanError> {
        let conv = extract_conv(problem, self.name())?.clone();
        let p = conv_params(invoke_params, self.name())?;
        if !matches!(invoke_params, InvokeParams::Forward(_)) {
            return Err(KernelPlanError::Solver(format!(
                "{} expects forward invoke params",
                self.name()
            )));
        }

        let construction_params = ConstructionParams {
            kernel_name: "naive_conv_fwd_nchw_f32".to_string(),
            global_size: p.out_desc.dims().to_vec(),
            tuning: tuning_for(db, &params_signature(p), self.name(), perf_cfg),
        };

        Ok(SolverConstruction {
            construction_params,
            invoker_factory: Box::new(move |params| {
                let conv = conv.clone();
                Invoker::new(
                    params.kernel_name.clone(),
                    Box::new(move |_handle, invoke_params| {
                        let p = match invoke_params {
                            InvokeParams::Forward(p) => p,
                            _ => {
                                return Err(KernelPlanError::Solver(
                                    "forward invoker replayed with non-forward params".into(),
                                ));
                            }
                        };
                        let x = p.in_buf.read();
                        let w = p.weights_buf.read();
                        let mut y = p.out_buf.write();
                        conv_fwd(
                            p.in_desc.dims(),
                            p.weights_desc.dims(),
                            p.out_desc.dims(),
                            &x,
                            &w,
                            &mut y,
                            &geometry(&conv),
                        );
                        Ok(())
                    }),
                )
            }),
        })
    }
}

impl Solver for ConvDirectNaiveBwd {
    fn name(&self) -> &'static str {
        "ConvDirectNaiveBwd"
    }

    fn is_applicable(&self, ctx: &ExecutionContext<'_>, problem: &Problem) -> bool {
        applicable(ctx, problem, Direction::Backward)
    }

    fn find_solution(
        &self,
        _ctx: &ExecutionContext<'_>,
        problem: &Problem,
        db: &SolverDb,
        invoke_params: &InvokeParams,
        perf_cfg: &str,
    ) -> Result<SolverConstruction, KernelPlanError> {
        let conv = extract_conv(problem, self.name())?.clone();
        let p = conv_params(invoke_params, self.name())?;
        if !matches!(invoke_params, InvokeParams::Backward(_)) {
            return Err(KernelPlanError::Solver(format!(
                "{} expects backward invoke params",
                self.name()
            )));
        }

        let construction_params = ConstructionParams {
            kernel_name: "naive_conv_bwd_data_nchw_f32".to_string(),
            global_size: p.out_desc.dims().to_vec(),
            tuning: tuning_for(db, &params_signature(p), self.name(), perf_cfg),
        };

        Ok(SolverConstruction {
            construction_params,
            invoker_factory: Box::new(move |params| {
                let conv = conv.clone();
                Invoker::new(
                    params.kernel_name.clone(),
                    Box::new(move |_handle, invoke_params| {
                        let p = match invoke_params {
                            InvokeParams::Backward(p) => p,
                            _ => {
                                return Err(KernelPlanError::Solver(
                                    "backward invoker replayed with non-backward params".into(),
                                ));
                            }
                        };
                        let dy = p.in_buf.read();
                        let w = p.weights_buf.read();
                        let mut dx = p.out_buf.write();
                        conv_bwd_data(
                            p.in_desc.dims(),
                            p.weights_desc.dims(),
                            p.out_desc.dims(),
                            &dy,
                            &w,
                            &mut dx,
                            &geometry(&conv),
                        );
                        Ok(())
                    }),
                )
            }),
        })
    }
}

impl Solver for ConvDirectNaiveWrw {
    fn name(&self) -> &'static str {
        "ConvDirectNaiveWrw"
    }

    fn is_applicable(&self, ctx: &ExecutionContext<'_>, problem: &Problem) -> bool {
        applicable(ctx, problem, Direction::BackwardWeights)
    }

    fn find_solution(
        &self,
        _ctx: &ExecutionContext<'_>,
        problem: &Problem,
        db: &SolverDb,
        invoke_params: &InvokeParams,
        perf_cfg: &str,
    ) -> Result<SolverConstruction, KernelPlanError> {
        let conv = extract_conv(problem, self.name())?.clone();
        let p = conv_params(invoke_params, self.name())?;
        if !matches!(invoke_params, InvokeParams::BackwardWeights(_)) {
            return Err(KernelPlanError::Solver(format!(
                "{} expects backward-weights invoke params",
                self.name()
            )));
        }

        let construction_params = ConstructionParams {
            kernel_name: "naive_conv_wrw_nchw_f32".to_string(),
            global_size: p.out_desc.dims().to_vec(),
            tuning: tuning_for(db, &params_signature(p), self.name(), perf_cfg),
        };

        Ok(SolverConstruction {
            construction_params,
            invoker_factory: Box::new(move |params| {
                let conv = conv.clone();
                Invoker::new(
                    params.kernel_name.clone(),
                    Box::new(move |_handle, invoke_params| {
                        let p = match invoke_params {
                            InvokeParams::BackwardWeights(p) => p,
                            _ => {
                                return Err(KernelPlanError::Solver(
                                    "wrw invoker replayed with non-wrw params".into(),
                                ));
                            }
                        };
                        // Role mapping for wrw: in = dY, weights slot = X,
                        // out = dW.
                        let dy = p.in_buf.read();
                        let x = p.weights_buf.read();
                        let mut dw = p.out_buf.write();
                        conv_wrw(
                            p.in_desc.dims(),
                            p.weights_desc.dims(),
                            p.out_desc.dims(),
                            &dy,
                            &x,
                            &mut dw,
                            &geometry(&conv),
                        );
                        Ok(())
                    }),
                )
            }),
        })
    }
}
