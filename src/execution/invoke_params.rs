use crate::fusion::OperatorArgs;
use crate::tensor::{Buffer, TensorDesc};

/// The three convolution tensor roles after direction mapping: `in` and
/// `weights` are read, `out` is written. For backward-weights the `weights`
/// slot carries the forward input X and `out` is the filter gradient W.
#[derive(Clone, Debug)]
pub struct ConvInvokeParams {
    pub in_desc: TensorDesc,
    pub in_buf: Buffer,
    pub weights_desc: TensorDesc,
    pub weights_buf: Buffer,
    pub out_desc: TensorDesc,
    pub out_buf: Buffer,
    pub workspace: Option<Buffer>,
    pub workspace_size: usize,
    pub fp16_alt: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FusedInvokeParams {
    pub op_args: OperatorArgs,
}

/// Direction-tagged invocation parameters handed to an invoker.
#[derive(Clone, Debug)]
pub enum InvokeParams {
    Forward(ConvInvokeParams),
    Backward(ConvInvokeParams),
    BackwardWeights(ConvInvokeParams),
    Fused(FusedInvokeParams),
}

impl InvokeParams {
    pub fn conv(&self) -> Option<&ConvInvokeParams> {
        match self {
            InvokeParams::Forward(p)
            | InvokeParams::Backward(p)
            | InvokeParams::BackwardWeights(p) => Some(p),
            InvokeParams::Fused(_) => None,
        }
    }
}
