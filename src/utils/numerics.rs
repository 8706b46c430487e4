use std::sync::atomic::{AtomicBool, Ordering};

use crate::tensor::{Buffer, DataType, TensorDesc};
use crate::utils::error::KernelPlanError;

static CHECK_NUMERICS: AtomicBool = AtomicBool::new(false);

/// Enable or disable the process-wide numeric validation hook.
pub fn set_check_numerics(enabled: bool) {
    CHECK_NUMERICS.store(enabled, Ordering::Relaxed);
}

pub fn check_numerics_enabled() -> bool {
    CHECK_NUMERICS.load(Ordering::Relaxed)
}

/// Scan a tensor buffer for NaN/Inf values. Only f32 tensors are scanned;
/// other data types pass through unchecked. A buffer shorter than its
/// descriptor is an invalid-shape error.
pub fn check_numerics(
    label: &str,
    desc: &TensorDesc,
    buffer: &Buffer,
) -> Result<(), KernelPlanError> {
    if desc.data_type() != DataType::F32 {
        return Ok(());
    }

    let data = buffer.read();
    let elements = desc.num_elements();
    if data.len() < elements {
        return Err(KernelPlanError::InvalidShape(format!(
            "{} buffer holds {} elements but its descriptor expects {}",
            label,
            data.len(),
            elements
        )));
    }

    for (i, v) in data[..elements].iter().enumerate() {
        if !v.is_finite() {
            return Err(KernelPlanError::Numerics(format!(
                "{} tensor contains non-finite value {} at index {}",
                label, v, i
            )));
        }
    }

    Ok(())
}
