//! Exact eigenvalues for orders 0 through 3.
//!
//! ```text
//! n = 2:  λ = (t ± √(t² - 4d)) / 2
//! n = 3:  λ³ - tλ² + mλ - d = 0,   λ = x + t/3   →   x³ + px + q = 0
//!         Δ = (q/2)² + (p/3)³
//! ```
//!
//! where `t` is the trace, `d` the determinant and `m` the sum of the
//! principal 2×2 minors.
//!
//! ## Complex pairs
//!
//! These solvers only report real numbers. When the characteristic
//! polynomial has a complex-conjugate pair, the pair is collapsed:
//!
//! - order 2: the shared real part `t/2` is reported twice;
//! - order 3 (`Δ > 0`): the single real root is reported three times.
//!
//! For the symmetric matrices this crate targets, the pair never arises.

use crate::ops::{self, sort_descending};
use crate::{Error, Result};
use ndarray::Array2;
use std::f64::consts::PI;

/// Largest order with a closed form.
pub const MAX_ORDER: usize = 3;

/// Relative threshold under which the cubic discriminant counts as zero.
const DISCRIMINANT_EPS: f64 = 1e-12;

/// Eigenvalues of a matrix of order ≤ 3, largest first.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<f64>> {
    let n = ops::validate(a)?;
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![a[[0, 0]]]),
        2 => Ok(order2(a)),
        3 => Ok(order3(a)),
        _ => Err(Error::UnsupportedOrder {
            order: n,
            max: MAX_ORDER,
        }),
    }
}

fn order2(a: &Array2<f64>) -> Vec<f64> {
    let trace = a[[0, 0]] + a[[1, 1]];
    let det = a[[0, 0]] * a[[1, 1]] - a[[0, 1]] * a[[1, 0]];
    let disc = trace * trace - 4.0 * det;

    if disc < 0.0 {
        let re = trace / 2.0;
        tracing::debug!(disc, "order-2 complex pair, reporting real part twice");
        return vec![re, re];
    }

    let s = disc.sqrt();
    vec![(trace + s) / 2.0, (trace - s) / 2.0]
}

fn order3(a: &Array2<f64>) -> Vec<f64> {
    let trace = ops::trace(a);
    let minors = a[[0, 0]] * a[[1, 1]] - a[[0, 1]] * a[[1, 0]]
        + a[[0, 0]] * a[[2, 2]] - a[[0, 2]] * a[[2, 0]]
        + a[[1, 1]] * a[[2, 2]] - a[[1, 2]] * a[[2, 1]];
    let det = det3(a);

    let shift = trace / 3.0;
    let p = minors - trace * trace / 3.0;
    let q = -2.0 * trace.powi(3) / 27.0 + trace * minors / 3.0 - det;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let delta = half_q * half_q + third_p.powi(3);
    let scale = (half_q * half_q).max(third_p.powi(3).abs());

    let mut roots = if delta.abs() <= DISCRIMINANT_EPS * scale {
        // One simple root and one double root (or a triple root when p = q = 0).
        let u = (-half_q).cbrt();
        vec![2.0 * u + shift, -u + shift, -u + shift]
    } else if delta > 0.0 {
        let sd = delta.sqrt();
        let x = (-half_q + sd).cbrt() + (-half_q - sd).cbrt();
        tracing::debug!(delta, "order-3 complex pair, reporting the real root three times");
        vec![x + shift; 3]
    } else {
        // Three distinct real roots; delta < 0 implies p < 0.
        let r = 2.0 * (-third_p).sqrt();
        let cos_arg = (3.0 * q / (2.0 * p)) * (-3.0 / p).sqrt();
        let theta = cos_arg.clamp(-1.0, 1.0).acos();
        (0..3)
            .map(|k| r * ((theta + 2.0 * PI * k as f64) / 3.0).cos() + shift)
            .collect()
    };

    sort_descending(&mut roots);
    roots
}

fn det3(a: &Array2<f64>) -> f64 {
    a[[0, 0]] * (a[[1, 1]] * a[[2, 2]] - a[[1, 2]] * a[[2, 1]])
        - a[[0, 1]] * (a[[1, 0]] * a[[2, 2]] - a[[1, 2]] * a[[2, 0]])
        + a[[0, 2]] * (a[[1, 0]] * a[[2, 1]] - a[[1, 1]] * a[[2, 0]])
}
