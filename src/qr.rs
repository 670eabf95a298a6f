//! Unshifted QR iteration.
//!
//! `A_{k+1} = R_k Q_k` where `A_k = Q_k R_k`. Each step is an orthogonal
//! similarity (`R Q = Qᵗ A Q`), so the spectrum and the trace are preserved
//! exactly while the strictly-lower part decays like `|λ_{i+1} / λ_i|^k`.
//!
//! Without shifts, convergence stalls on eigenvalues of nearly equal
//! magnitude. The iteration still returns the current diagonal, which is
//! the best available estimate.

use crate::config::Criteria;
use crate::householder::{self, Qr};
use crate::ops::{self, sort_descending};
use ndarray::Array2;

/// Outcome of [`qr_algorithm`].
#[derive(Debug, Clone)]
pub struct QrOutcome {
    /// Diagonal of the final iterate, largest first.
    pub eigenvalues: Vec<f64>,
    /// Orthogonal factor of the last decomposition.
    pub q: Array2<f64>,
    /// Triangular factor of the last decomposition.
    pub r: Array2<f64>,
    pub iterations: usize,
    /// Whether every strictly-lower entry dropped below the tolerance.
    pub converged: bool,
}

/// Full spectrum of a square matrix by unshifted QR iteration.
///
/// # Arguments
///
/// * `a` - Square matrix, not modified. Symmetric input converges to a
///   diagonal; other input gives best-effort values.
/// * `criteria` - Tolerance on the strictly-lower entries, iteration cap and
///   optional deadline.
///
/// # Example
///
/// ```
/// use lapl_eigen::{qr_algorithm, Criteria};
/// use ndarray::array;
///
/// let triangle = array![[2.0, -1.0, -1.0], [-1.0, 2.0, -1.0], [-1.0, -1.0, 2.0]];
/// let out = qr_algorithm(&triangle, &Criteria::default());
/// assert!(out.converged);
/// assert!((out.eigenvalues[0] - 3.0).abs() < 1e-8);
/// assert!(out.eigenvalues[2].abs() < 1e-8);
/// ```
pub fn qr_algorithm(a: &Array2<f64>, criteria: &Criteria) -> QrOutcome {
    let n = a.nrows();
    let mut current = a.to_owned();
    let mut last = Qr {
        q: ops::identity(n),
        r: current.clone(),
    };
    let mut iterations = 0;
    let mut converged = subdiagonal_converged(&current, criteria.tolerance);

    while !converged && iterations < criteria.max_iterations {
        if criteria.expired() {
            tracing::debug!(iterations, "qr iteration hit its deadline");
            break;
        }
        last = householder::decompose(&current, criteria.tolerance);
        current = ops::multiply(&last.r, &last.q);
        iterations += 1;
        converged = subdiagonal_converged(&current, criteria.tolerance);
    }

    if !converged {
        tracing::debug!(
            n,
            iterations,
            residual = max_subdiagonal(&current),
            "qr iteration did not converge, returning current diagonal"
        );
    }

    let mut eigenvalues = current.diag().to_vec();
    sort_descending(&mut eigenvalues);

    QrOutcome {
        eigenvalues,
        q: last.q,
        r: last.r,
        iterations,
        converged,
    }
}

/// Converged once every strictly-lower entry is below `tol`: the iterate is
/// triangular (diagonal for symmetric input) and its diagonal holds the
/// eigenvalues. Checking only `A[i][i-1]` is not enough, since a block
/// coupling like `A[2][0]` can survive a zero first subdiagonal.
fn subdiagonal_converged(a: &Array2<f64>, tol: f64) -> bool {
    max_subdiagonal(a) < tol
}

fn max_subdiagonal(a: &Array2<f64>) -> f64 {
    a.indexed_iter()
        .filter(|((i, j), _)| j < i)
        .map(|(_, x)| x.abs())
        .fold(0.0, f64::max)
}
