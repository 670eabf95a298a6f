//! Power iteration for the dominant eigenpair.
//!
//! Repeated multiplication amplifies the component of the start vector along
//! the eigenvector of largest-magnitude eigenvalue by `|λ₀/λ₁|` per step.
//! The eigenvalue estimate is the Rayleigh quotient `vᵗAv` of the current
//! unit iterate.
//!
//! The start vector is drawn from a caller-supplied [`rand::Rng`], so a
//! seeded generator makes the whole trajectory reproducible.

use crate::config::Criteria;
use crate::ops;
use ndarray::{Array1, Array2};
use rand::Rng;

/// An eigenvalue with a unit-norm eigenvector (sign is arbitrary).
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    pub value: f64,
    pub vector: Array1<f64>,
}

/// Estimate the dominant eigenpair of `a`.
///
/// Stops when the eigenvalue estimate changes by less than the tolerance,
/// when `A·v` collapses below the tolerance (the matrix annihilates the
/// iterate), or when the cap or deadline is reached. None of these is an
/// error: the current estimate is returned.
pub fn power_iteration<R: Rng + ?Sized>(
    a: &Array2<f64>,
    criteria: &Criteria,
    rng: &mut R,
) -> EigenPair {
    let n = a.nrows();
    let mut v = random_unit_vector(n, rng);
    if n == 0 {
        return EigenPair {
            value: 0.0,
            vector: v,
        };
    }

    let mut lambda = 0.0;
    let mut converged = false;
    let mut steps = 0;

    while steps < criteria.max_iterations {
        if criteria.expired() {
            tracing::debug!(steps, "power iteration hit its deadline");
            break;
        }
        steps += 1;

        let w = ops::mat_vec(a, &v);
        let next_lambda = ops::dot(v.view(), w.view());
        let w_norm = ops::norm(w.view());

        if w_norm < criteria.tolerance {
            lambda = next_lambda;
            converged = true;
            tracing::trace!(steps, lambda, "iterate annihilated");
            break;
        }

        v = w / w_norm;
        let delta = (next_lambda - lambda).abs();
        lambda = next_lambda;
        tracing::trace!(steps, lambda, delta, "power step");

        if delta < criteria.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::debug!(n, steps, lambda, "power iteration did not converge");
    }

    EigenPair {
        value: lambda,
        vector: v,
    }
}

/// Uniform entries in `[-1, 1)`, normalised. Falls back to `e₀` if the draw
/// is numerically zero.
fn random_unit_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
    let mut v: Array1<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let norm = ops::norm(v.view());
    if norm > f64::EPSILON {
        v /= norm;
    } else if n > 0 {
        v.fill(0.0);
        v[0] = 1.0;
    }
    v
}
