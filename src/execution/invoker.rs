use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::execution::handle::Handle;
use crate::execution::invoke_params::InvokeParams;
use crate::utils::error::KernelPlanError;

/// Kernel construction arguments produced by a solver's search: which kernel
/// to build, its launch geometry, and the tuning configuration it settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructionParams {
    pub kernel_name: String,
    pub global_size: Vec<usize>,
    pub tuning: Option<String>,
}

/// Builds an invoker from construction params. Returned by a solver alongside
/// the params themselves.
pub type InvokerFactory = Box<dyn Fn(&ConstructionParams) -> Invoker + Send + Sync>;

type InvokeFn = Box<dyn Fn(&Handle, &InvokeParams) -> Result<(), KernelPlanError> + Send + Sync>;

/// An executable binding of a concrete kernel to invocation-time parameters.
/// Owned by the handle's cache and shared read-only across solutions.
pub struct Invoker {
    kernel_name: String,
    invoke: InvokeFn,
}

impl Invoker {
    pub fn new(kernel_name: impl Into<String>, invoke: InvokeFn) -> Self {
        Self {
            kernel_name: kernel_name.into(),
            invoke,
        }
    }

    pub fn kernel_name(&self) -> &str {
        &self.kernel_name
    }

    pub fn invoke(
        &self,
        handle: &Handle,
        params: &InvokeParams,
    ) -> Result<(), KernelPlanError> {
        (self.invoke)(handle, params)
    }
}

impl Debug for Invoker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Invoker({})", self.kernel_name)
    }
}
