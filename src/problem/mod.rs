mod argument;
pub use argument::{ResolvedInput, RunInput, TensorArgumentId, resolve_input};
mod direction;
pub use direction::Direction;
mod operator;
pub use operator::{
    ActivationDescriptor, ActivationMode, BiasDescriptor, ConvolutionDescriptor, ConvolutionMode,
    Fp16AltAttribute, OperatorDescriptor,
};
mod problem;
pub use problem::{NetworkConfig, Problem, ProblemVariant};
