use crate::tensor::TensorDesc;

/// Single-threaded direct 2D convolution kernels for f32 NCHW tensors.
///
/// Layouts: x `[N, C, H, W]`, w `[K, C/group, R, S]`, y `[N, K, Ho, Wo]`.
/// Input position for an output position: `i = o * stride - pad + k * dilation`.
pub struct ConvGeometry {
    pub pads: Vec<usize>,
    pub strides: Vec<usize>,
    pub dilations: Vec<usize>,
    pub group: usize,
}

pub fn conv_fwd(
    x_dims: &[usize],
    w_dims: &[usize],
    y_dims: &[usize],
    x: &[f32],
    w: &[f32],
    y: &mut [f32],
    geom: &ConvGeometry,
) {
    let (n, c, k) = (x_dims[0], x_dims[1], w_dims[0]);
    let k_per_group = k / geom.group;
    let c_per_group = c / geom.group;

    let x_strides = TensorDesc::compute_strides(x_dims);
    let w_strides = TensorDesc::compute_strides(w_dims);
    let y_strides = TensorDesc::compute_strides(y_dims);

    for ni in 0..n {
        for ki in 0..k {
            let group_id = ki / k_per_group;
            let c_start = group_id * c_per_group;

            for oh in 0..y_dims[2] {
                for ow in 0..y_dims[3] {
                    let mut acc = 0.0f32;

                    for cg in 0..c_per_group {
                        for r in 0..w_dims[2] {
                            for s in 0..w_dims[3] {
                                let ih = (oh * geom.strides[0] + r * geom.dilations[0]) as isize
                                    - geom.pads[0] as isize;
                                let iw = (ow * geom.strides[1] + s * geom.dilations[1]) as isize
                                    - geom.pads[1] as isize;
                                if ih < 0
                                    || iw < 0
                                    || ih >= x_dims[2] as isize
                                    || iw >= x_dims[3] as isize
                                {
                                    continue;
                                }

                                let x_off = TensorDesc::offset(
                                    &[ni, c_start + cg, ih as usize, iw as usize],
                                    &x_strides,
                                );
                                let w_off =
                                    TensorDesc::offset(&[ki, cg, r, s], &w_strides);
                                acc += x[x_off] * w[w_off];
                            }
                        }
                    }

                    let y_off = TensorDesc::offset(&[ni, ki, oh, ow], &y_strides);
                    y[y_off] = acc;
                }
            }
        }
    }
}

/// Backward-data: scatter each output gradient back through the filter.
/// `dx` is fully overwritten.
pub fn conv_bwd_data(
    dy_dims: &[usize],
    w_dims: &[usize],
    dx_dims: &[usize],
    dy: &[f32],
    w: &[f32],
    dx: &mut [f32],
    geom: &ConvGeometry,
) {
    let (n, k, c) = (dy_dims[0], dy_dims[1], dx_dims[1]);
    let k_per_group = k / geom.group;
    let c_per_group = c / geom.group;

    let dy_strides = TensorDesc::compute_strides(dy_dims);
    let w_strides = TensorDesc::compute_strides(w_dims);
    let dx_strides = TensorDesc::compute_strides(dx_dims);

    dx.fill(0.0);

    for ni in 0..n {
        for ki in 0..k {
            let group_id = ki / k_per_group;
            let c_start = group_id * c_per_group;

            for oh in 0..dy_dims[2] {
                for ow in 0..dy_dims[3] {
                    let dy_off = TensorDesc::offset(&[ni, ki, oh, ow], &dy_strides);
                    let grad = dy[dy_off];

                    for cg in 0..c_per_group {
                        for r in 0..w_dims[2] {
                            for s in 0..w_dims[3] {
                                let ih = (oh * geom.strides[0] + r * geom.dilations[0]) as isize
                                    - geom.pads[0] as isize;
                                let iw = (ow * geom.strides[1] + s * geom.dilations[1]) as isize
                                    - geom.pads[1] as isize;
                                if ih < 0
                                    || iw < 0
                                    || ih >= dx_dims[2] as isize
                                    || iw >= dx_dims[3] as isize
                                {
                                    continue;
                                }

                                let w_off =
                                    TensorDesc::offset(&[ki, cg, r, s], &w_strides);
                                let dx_off = TensorDesc::offset(
                                    &[ni, c_start + cg, ih as usize, iw as usize],
                                    &dx_strides,
                                );
                                dx[dx_off] += grad * w[w_off];
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Backward-weights: accumulate the filter gradient over every output
/// position. `dw` is fully overwritten.
pub fn conv_wrw(
    dy_dims: &[usize],
    x_dims: &[usize],
    dw_dims: &[usize],
    dy: &[f32],
    x: &[f32],
    dw: &mut [f32],
    geom: &ConvGeometry,
) {
    let (n, k) = (dy_dims[0], dy_dims[1]);
    let k_per_group = k / geom.group;
    let c_per_group = dw_dims[1];

    let dy_strides = TensorDesc::compute_strides(dy_dims);
    let x_strides = TensorDesc::compute_strides(x_dims);
    let dw_strides = TensorDesc::compute_strides(dw_dims);

    dw.fill(0.0);

    for ni in 0..n {
        for ki in 0..k {
            let group_id = ki / k_per_group;
            let c_start = group_id * c_per_group;

            for oh in 0..dy_dims[2] {
                for ow in 0..dy_dims[3] {
                    let dy_off = TensorDesc::offset(&[ni, ki, oh, ow], &dy_strides);
                    let grad = dy[dy_off];

                    for cg in 0..c_per_group {
                        for r in 0..dw_dims[2] {
                            for s in 0..dw_dims[3] {
                                let ih = (oh * geom.strides[0] + r * geom.dilations[0]) as isize
                                    - geom.pads[0] as isize;
                                let iw = (ow * geom.strides[1] + s * geom.dilations[1]) as isize
                                    - geom.pads[1] as isize;
                                if ih < 0
                                    || iw < 0
                                    || ih >= x_dims[2] as isize
                                    || iw >= x_dims[3] as isize
                                {
                                    continue;
                                }

                                let x_off = TensorDesc::offset(
                                    &[ni, c_start + cg, ih as usize, iw as usize],
                                    &x_strides,
                                );
                                let dw_off =
                                    TensorDesc::offset(&[ki, cg, r, s], &dw_strides);
                                dw[dw_off] += grad * x[x_off];
                            }
                        }
                    }
                }
            }
        }
    }
}
