//! Transpose-mode convolution: structural relabeling and observable
//! equivalence with the explicitly-backward form.

use std::collections::HashMap;

use rand::Rng;

use kernelplan::{
    Buffer, ConvolutionDescriptor, ConvolutionMode, Direction, Handle, OperatorDescriptor,
    Problem, ProblemVariant, RunInput, Solution, SolverId, TensorArgumentId, TensorDesc,
};

const CIN: usize = 2;
const COUT: usize = 3;
const IN_HW: usize = 4;
const OUT_HW: usize = 6; // 4 + 3 - 1, stride 1, no padding

fn random_vec(len: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn transpose_conv() -> ConvolutionDescriptor {
    let mut conv = ConvolutionDescriptor::default();
    conv.mode = ConvolutionMode::Transpose;
    conv
}

// ---------------------------------------------------------------------------
// Structural transpose
// ---------------------------------------------------------------------------

#[test]
fn make_transposed_flips_direction_and_swaps_descriptors() {
    let mut problem = Problem::new(
        OperatorDescriptor::Convolution(transpose_conv()),
        Direction::Forward,
    );
    let x_desc = TensorDesc::new(vec![1, CIN, IN_HW, IN_HW]);
    let y_desc = TensorDesc::new(vec![1, COUT, OUT_HW, OUT_HW]);
    problem.register_tensor_descriptor(TensorArgumentId::ConvolutionX, x_desc.clone());
    problem.register_tensor_descriptor(TensorArgumentId::ConvolutionY, y_desc.clone());

    let transposed = problem.make_transposed();

    assert_eq!(transposed.direction(), Direction::Backward);
    match transposed.operator() {
        OperatorDescriptor::Convolution(conv) => {
            assert_eq!(conv.mode, ConvolutionMode::Normal)
        }
        other => panic!("unexpected operator: {:?}", other),
    }
    assert_eq!(
        transposed.tensor_descriptor(TensorArgumentId::ConvolutionX),
        Some(&y_desc)
    );
    assert_eq!(
        transposed.tensor_descriptor(TensorArgumentId::ConvolutionY),
        Some(&x_desc)
    );
}

#[test]
fn make_transposed_keeps_backward_weights_direction() {
    let problem = Problem::new(
        OperatorDescriptor::Convolution(transpose_conv()),
        Direction::BackwardWeights,
    );
    assert_eq!(
        problem.make_transposed().direction(),
        Direction::BackwardWeights
    );
}

// ---------------------------------------------------------------------------
// Observable equivalence
// ---------------------------------------------------------------------------

#[test]
fn transpose_forward_matches_explicit_backward() {
    // Transpose-conv weight layout: [CIN, COUT, 3, 3]
    let a = random_vec(CIN * IN_HW * IN_HW);
    let w = random_vec(CIN * COUT * 3 * 3);

    // Path 1: transpose-mode problem, direction Forward, x=A, y=B
    let b_transpose = {
        let mut problem = Problem::new(
            OperatorDescriptor::Convolution(transpose_conv()),
            Direction::Forward,
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionX,
            TensorDesc::new(vec![1, CIN, IN_HW, IN_HW]),
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionW,
            TensorDesc::new(vec![CIN, COUT, 3, 3]),
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionY,
            TensorDesc::new(vec![1, COUT, OUT_HW, OUT_HW]),
        );
        let solution = Solution::new(
            SolverId::new("ConvDirectNaiveBwd"),
            ProblemVariant::Single(problem),
            0.1,
            0,
            None,
        );

        let out = Buffer::zeroed(COUT * OUT_HW * OUT_HW);
        let inputs = HashMap::from([
            (
                TensorArgumentId::ConvolutionX,
                RunInput::buffer_only(Buffer::from_vec(a.clone())),
            ),
            (
                TensorArgumentId::ConvolutionW,
                RunInput::buffer_only(Buffer::from_vec(w.clone())),
            ),
            (TensorArgumentId::ConvolutionY, RunInput::buffer_only(out.clone())),
        ]);

        let handle = Handle::with_reference_solvers();
        solution.run(&handle, &inputs, None, 0).unwrap();
        out.to_vec()
    };

    // Path 2: normal-mode problem, direction Backward, x=B, y=A
    let b_backward = {
        let mut problem = Problem::new(
            OperatorDescriptor::Convolution(ConvolutionDescriptor::default()),
            Direction::Backward,
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionX,
            TensorDesc::new(vec![1, COUT, OUT_HW, OUT_HW]),
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionW,
            TensorDesc::new(vec![CIN, COUT, 3, 3]),
        );
        problem.register_tensor_descriptor(
            TensorArgumentId::ConvolutionY,
            TensorDesc::new(vec![1, CIN, IN_HW, IN_HW]),
        );
        let solution = Solution::new(
            SolverId::new("ConvDirectNaiveBwd"),
            ProblemVariant::Single(problem),
            0.1,
            0,
            None,
        );

        let out = Buffer::zeroed(COUT * OUT_HW * OUT_HW);
        let inputs = HashMap::from([
            (TensorArgumentId::ConvolutionX, RunInput::buffer_only(out.clone())),
            (
                TensorArgumentId::ConvolutionW,
                RunInput::buffer_only(Buffer::from_vec(w.clone())),
            ),
            (
                TensorArgumentId::ConvolutionY,
                RunInput::buffer_only(Buffer::from_vec(a.clone())),
            ),
        ]);

        let handle = Handle::with_reference_solvers();
        solution.run(&handle, &inputs, None, 0).unwrap();
        out.to_vec()
    };

    assert_eq!(b_transpose.len(), b_backward.len());
    for (i, (lhs, rhs)) in b_transpose.iter().zip(b_backward.iter()).enumerate() {
        assert!(
            (lhs - rhs).abs() < 1e-6,
            "mismatch at {}: {} vs {}",
            i,
            lhs,
            rhs
        );
    }
}
