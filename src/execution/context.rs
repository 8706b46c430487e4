use crate::execution::handle::Handle;
use crate::tensor::DataType;

/// Per-resolution context bound to the handle. Problems configure their
/// numeric-precision policy here before a solver search runs.
pub struct ExecutionContext<'a> {
    pub handle: &'a Handle,
    pub data_type: Option<DataType>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(handle: &'a Handle) -> Self {
        Self {
            handle,
            data_type: None,
        }
    }
}
