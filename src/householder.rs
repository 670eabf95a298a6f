//! Householder QR decomposition.
//!
//! For each column `k`, the reflection `H = I - 2vvᵗ` maps the part of the
//! column on and below the diagonal onto `alpha·e₁`, with
//! `alpha = -sign(a_kk)·‖x‖` so that `v = x - alpha·e₁` never suffers
//! cancellation. After `n - 1` steps the working copy is upper-triangular:
//!
//! ```text
//! H_{n-2} ··· H_1 H_0 A = R        Q = H_0 H_1 ··· H_{n-2}
//! ```

use crate::ops;
use ndarray::{s, Array1, Array2};

/// Result of [`decompose`]: `A = Q·R`.
#[derive(Debug, Clone)]
pub struct Qr {
    /// Orthogonal factor.
    pub q: Array2<f64>,
    /// Upper-triangular factor; entries below the diagonal are exactly zero.
    pub r: Array2<f64>,
}

impl Qr {
    /// `Q·R`, which should reproduce the decomposed matrix.
    pub fn reconstruct(&self) -> Array2<f64> {
        ops::multiply(&self.q, &self.r)
    }
}

/// Decompose a square matrix as `A = Q·R`.
///
/// Columns whose subdiagonal part already has norm below `tol` are left
/// alone. The input is copied.
pub fn decompose(a: &Array2<f64>, tol: f64) -> Qr {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols(), "householder QR expects a square matrix");

    let mut r = a.to_owned();
    let mut q = ops::identity(n);

    for k in 0..n.saturating_sub(1) {
        let sub_norm = ops::norm(r.slice(s![k + 1.., k]));
        if sub_norm < tol {
            continue;
        }

        let x: Array1<f64> = r.slice(s![k.., k]).to_owned();
        let x_norm = ops::norm(x.view());
        let alpha = if x[0] >= 0.0 { -x_norm } else { x_norm };

        let mut v = x;
        v[0] -= alpha;
        let v_norm = ops::norm(v.view());
        if v_norm == 0.0 {
            continue;
        }
        v.mapv_inplace(|e| e / v_norm);

        // R[k.., k..] ← H·R[k.., k..] = R - 2v(vᵗR)
        {
            let mut block = r.slice_mut(s![k.., k..]);
            let vt_block = v.dot(&block);
            for (i, vi) in v.iter().enumerate() {
                for (j, w) in vt_block.iter().enumerate() {
                    block[[i, j]] -= 2.0 * vi * w;
                }
            }
        }

        // Q[.., k..] ← Q[.., k..]·H = Q - 2(Qv)vᵗ
        {
            let mut cols = q.slice_mut(s![.., k..]);
            let qv = cols.dot(&v);
            for (i, qi) in qv.iter().enumerate() {
                for (j, vj) in v.iter().enumerate() {
                    cols[[i, j]] -= 2.0 * qi * vj;
                }
            }
        }
    }

    for i in 0..n {
        for j in 0..i {
            r[[i, j]] = 0.0;
        }
    }

    Qr { q, r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    const TOL: f64 = 1e-10;

    fn orthogonality_error(q: &Array2<f64>) -> f64 {
        let qtq = ops::multiply(&ops::transpose(q), q);
        ops::max_abs_diff(&qtq, &ops::identity(q.nrows()))
    }

    #[test]
    fn test_identity_decomposes_to_identity() {
        let qr = decompose(&Array2::eye(2), TOL);
        assert_eq!(qr.q, Array2::<f64>::eye(2));
        assert_eq!(qr.r, Array2::<f64>::eye(2));
    }

    #[test]
    fn test_empty_and_scalar() {
        let qr = decompose(&Array2::zeros((0, 0)), TOL);
        assert_eq!(qr.q.dim(), (0, 0));

        let qr = decompose(&array![[-3.0]], TOL);
        assert_eq!(qr.q, array![[1.0]]);
        assert_eq!(qr.r, array![[-3.0]]);
    }

    #[test]
    fn test_textbook_example() {
        let a = array![
            [12.0, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0]
        ];
        let qr = decompose(&a, TOL);

        assert!(ops::max_abs_diff(&qr.reconstruct(), &a) < 1e-10);
        assert!(orthogonality_error(&qr.q) < 1e-12);
        // |R| diagonal is (14, 175, 35) up to sign.
        assert!((qr.r[[0, 0]].abs() - 14.0).abs() < 1e-10);
        assert!((qr.r[[1, 1]].abs() - 175.0).abs() < 1e-10);
        assert!((qr.r[[2, 2]].abs() - 35.0).abs() < 1e-10);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let a = array![[2.0, -1.0], [-1.0, 2.0]];
        let before = a.clone();
        let _ = decompose(&a, TOL);
        assert_eq!(a, before);
    }

    #[test]
    fn test_upper_triangular_input_skips_every_step() {
        let a = array![[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [0.0, 0.0, 6.0]];
        let qr = decompose(&a, TOL);
        assert_eq!(qr.q, Array2::<f64>::eye(3));
        assert_eq!(qr.r, a);
    }

    #[test]
    fn test_singular_laplacian() {
        let l = array![[1.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 1.0]];
        let qr = decompose(&l, TOL);
        assert!(ops::max_abs_diff(&qr.reconstruct(), &l) < 1e-12);
        // Rank 2: the last pivot vanishes.
        assert!(qr.r[[2, 2]].abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_qr_round_trip_and_orthogonality(
            n in 1usize..8,
            entries in prop::collection::vec(-10.0f64..10.0, 64),
        ) {
            let a = Array2::from_shape_fn((n, n), |(i, j)| entries[i * 8 + j]);
            let qr = decompose(&a, TOL);

            prop_assert!(ops::max_abs_diff(&qr.reconstruct(), &a) < 1e-9);
            prop_assert!(orthogonality_error(&qr.q) < 1e-10);
            for i in 0..n {
                for j in 0..i {
                    prop_assert_eq!(qr.r[[i, j]], 0.0);
                }
            }
        }
    }
}
