use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelPlanError {
    #[error("Insufficient workspace: {0}")]
    InsufficientWorkspace(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Version mismatch: {0}")]
    VersionMismatch(String),

    #[error("Numerics check failed: {0}")]
    Numerics(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// Parse/encode failures that never reach header validation
impl From<serde_json::Error> for KernelPlanError {
    fn from(e: serde_json::Error) -> Self {
        KernelPlanError::Serialization(format!("serde_json: {}", e))
    }
}
