use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::problem::ProblemVariant;
use crate::solution::solution::{Solution, SolverId};
use crate::utils::error::KernelPlanError;

/// Record header: `validation` identifies "this is a solution record" and
/// `version` the format revision. The two are checked independently so a
/// malformed buffer and an outdated-but-well-formed one stay distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationMetadata {
    pub validation: u64,
    pub version: u64,
}

impl SerializationMetadata {
    pub const CURRENT: Self = Self {
        validation: 123456786,
        version: 1,
    };
}

#[derive(Serialize, Deserialize)]
struct SolutionRecord {
    header: SerializationMetadata,
    time: f32,
    workspace: usize,
    solver: String,
    problem: ProblemVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    perf_cfg: Option<String>,
}

impl Solution {
    pub fn to_value(&self) -> Result<Value, KernelPlanError> {
        let record = SolutionRecord {
            header: SerializationMetadata::CURRENT,
            time: self.time(),
            workspace: self.workspace_required(),
            solver: self.solver().as_str().to_string(),
            problem: self.problem().clone(),
            perf_cfg: self.perf_cfg().map(str::to_string),
        };
        Ok(serde_json::to_value(record)?)
    }

    pub fn to_json(&self) -> Result<String, KernelPlanError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    pub fn from_value(value: Value) -> Result<Self, KernelPlanError> {
        // The header is validated before any other field is interpreted.
        let header_value = value.get("header").ok_or_else(|| {
            KernelPlanError::CorruptData("solution record has no header".into())
        })?;
        let header: SerializationMetadata = serde_json::from_value(header_value.clone())
            .map_err(|e| {
                KernelPlanError::CorruptData(format!("malformed solution header: {}", e))
            })?;

        let current = SerializationMetadata::CURRENT;
        if header.validation != current.validation {
            return Err(KernelPlanError::CorruptData(
                "Invalid buffer has been passed to the solution deserialization".into(),
            ));
        }
        if header.version != current.version {
            return Err(KernelPlanError::VersionMismatch(
                "Data from wrong version has been passed to the solution deserialization".into(),
            ));
        }

        let record: SolutionRecord = serde_json::from_value(value)?;
        Ok(Solution::new(
            SolverId::new(record.solver),
            record.problem,
            record.time,
            record.workspace,
            record.perf_cfg,
        ))
    }

    pub fn from_json(data: &str) -> Result<Self, KernelPlanError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }
}
