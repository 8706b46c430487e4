//! Solution record round-trips and header validation: corruption and version
//! skew are reported as distinct failures.

use kernelplan::{
    ConvolutionDescriptor, Direction, KernelPlanError, OperatorDescriptor, Problem,
    ProblemVariant, SerializationMetadata, Solution, SolverId, TensorArgumentId, TensorDesc,
};
use serde_json::{Value, json};

fn sample_solution(perf_cfg: Option<String>) -> Solution {
    let mut problem = Problem::new(
        OperatorDescriptor::Convolution(ConvolutionDescriptor::default()),
        Direction::Forward,
    );
    problem.register_tensor_descriptor(
        TensorArgumentId::ConvolutionX,
        TensorDesc::new(vec![5, 3, 32, 32]),
    );
    problem.register_tensor_descriptor(
        TensorArgumentId::ConvolutionW,
        TensorDesc::new(vec![4, 3, 3, 3]),
    );
    problem.register_tensor_descriptor(
        TensorArgumentId::ConvolutionY,
        TensorDesc::new(vec![5, 4, 30, 30]),
    );

    Solution::new(
        SolverId::new("ConvDirectNaiveFwd"),
        ProblemVariant::Single(problem),
        1.25,
        4096,
        perf_cfg,
    )
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_preserves_every_field() {
    let original = sample_solution(Some("tile=4".to_string()));
    let decoded = Solution::from_json(&original.to_json().unwrap()).unwrap();

    assert_eq!(decoded.solver(), original.solver());
    assert_eq!(decoded.problem(), original.problem());
    assert_eq!(decoded.time(), original.time());
    assert_eq!(decoded.workspace_required(), original.workspace_required());
    assert_eq!(decoded.perf_cfg(), original.perf_cfg());
}

#[test]
fn round_trip_without_tuning_payload() {
    let original = sample_solution(None);
    let encoded = original.to_value().unwrap();
    // Absent payload is omitted from the record entirely
    assert!(encoded.get("perf_cfg").is_none());

    let decoded = Solution::from_value(encoded).unwrap();
    assert_eq!(decoded.perf_cfg(), None);
}

#[test]
fn encoded_record_carries_current_header() {
    let encoded = sample_solution(None).to_value().unwrap();
    let header: SerializationMetadata =
        serde_json::from_value(encoded["header"].clone()).unwrap();
    assert_eq!(header, SerializationMetadata::CURRENT);
}

#[test]
fn round_trip_of_fused_problem() {
    use kernelplan::{FusedArg, FusedOperator, FusedProblem};

    let fused = FusedProblem::new(vec![FusedOperator {
        operator: OperatorDescriptor::Convolution(ConvolutionDescriptor::default()),
        args: vec![
            FusedArg {
                id: TensorArgumentId::ConvolutionX,
                descriptor: TensorDesc::new(vec![1, 3, 8, 8]),
            },
            FusedArg {
                id: TensorArgumentId::ConvolutionY,
                descriptor: TensorDesc::new(vec![1, 4, 6, 6]),
            },
        ],
    }]);
    let original = Solution::new(
        SolverId::new("FusedTest"),
        ProblemVariant::Fused(fused),
        0.5,
        0,
        None,
    );

    let decoded = Solution::from_json(&original.to_json().unwrap()).unwrap();
    assert_eq!(decoded.problem(), original.problem());
}

// ---------------------------------------------------------------------------
// Header validation
// ---------------------------------------------------------------------------

#[test]
fn wrong_validation_number_is_corrupt_data() {
    let mut encoded = sample_solution(None).to_value().unwrap();
    encoded["header"]["validation"] = json!(999);

    let err = Solution::from_value(encoded).unwrap_err();
    assert!(matches!(err, KernelPlanError::CorruptData(_)));
}

#[test]
fn wrong_version_is_version_mismatch() {
    let mut encoded = sample_solution(None).to_value().unwrap();
    encoded["header"]["version"] = json!(SerializationMetadata::CURRENT.version + 1);

    let err = Solution::from_value(encoded).unwrap_err();
    assert!(matches!(err, KernelPlanError::VersionMismatch(_)));
}

#[test]
fn validation_check_precedes_version_check() {
    // Both fields wrong: corruption wins, the version is never consulted
    let mut encoded = sample_solution(None).to_value().unwrap();
    encoded["header"]["validation"] = json!(999);
    encoded["header"]["version"] = json!(999);

    let err = Solution::from_value(encoded).unwrap_err();
    assert!(matches!(err, KernelPlanError::CorruptData(_)));
}

#[test]
fn corrupt_header_rejected_even_with_broken_body() {
    // The header gate fires before any other field is interpreted
    let encoded = json!({
        "header": { "validation": 999, "version": 1 },
        "time": "not-a-number",
    });

    let err = Solution::from_value(encoded).unwrap_err();
    assert!(matches!(err, KernelPlanError::CorruptData(_)));
}

#[test]
fn missing_header_is_corrupt_data() {
    let err = Solution::from_value(json!({ "time": 1.0 })).unwrap_err();
    assert!(matches!(err, KernelPlanError::CorruptData(_)));
}

#[test]
fn unparseable_input_is_a_serialization_error() {
    let err = Solution::from_json("not json at all").unwrap_err();
    assert!(matches!(err, KernelPlanError::Serialization(_)));
}

#[test]
fn header_value_round_trips() {
    let value: Value = serde_json::to_value(SerializationMetadata::CURRENT).unwrap();
    let back: SerializationMetadata = serde_json::from_value(value).unwrap();
    assert_eq!(back, SerializationMetadata::CURRENT);
}
