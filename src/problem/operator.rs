use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvolutionMode {
    Normal,
    Transpose,
}

/// Per-direction toggles for the architecture-specific alternate fp16 rounding
/// mode. Read by the invocation builder, opaque to everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fp16AltAttribute {
    pub fwd: bool,
    pub bwd: bool,
    pub wrw: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvolutionDescriptor {
    pub mode: ConvolutionMode,
    pub pads: Vec<usize>,
    pub strides: Vec<usize>,
    pub dilations: Vec<usize>,
    pub group_count: usize,
    pub fp16_alt: Fp16AltAttribute,
}

impl ConvolutionDescriptor {
    /// Unit strides/dilations, zero pads, single group.
    pub fn with_spatial_rank(rank: usize) -> Self {
        Self {
            mode: ConvolutionMode::Normal,
            pads: vec![0; rank],
            strides: vec![1; rank],
            dilations: vec![1; rank],
            group_count: 1,
            fp16_alt: Fp16AltAttribute::default(),
        }
    }

    pub fn spatial_rank(&self) -> usize {
        self.strides.len()
    }
}

impl Default for ConvolutionDescriptor {
    fn default() -> Self {
        Self::with_spatial_rank(2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationMode {
    ReLU,
    Sigmoid,
    Tanh,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationDescriptor {
    pub mode: ActivationMode,
    pub alpha: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasDescriptor;

/// Tagged union over the operator kinds a problem can describe. Exhaustively
/// matched at every dispatch point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OperatorDescriptor {
    Convolution(ConvolutionDescriptor),
    Activation(ActivationDescriptor),
    Bias(BiasDescriptor),
}

impl OperatorDescriptor {
    pub fn kind_tag(&self) -> &'static str {
        match self {
            OperatorDescriptor::Convolution(_) => "conv",
            OperatorDescriptor::Activation(_) => "activ",
            OperatorDescriptor::Bias(_) => "bias",
        }
    }
}
