//! What the display layer receives: eigenvalues plus the Laplacian they
//! came from.

use crate::ops;
use ndarray::Array2;

/// Laplacian eigenvalues (largest first) and the Laplacian itself.
#[derive(Debug, Clone)]
pub struct Spectrum {
    eigenvalues: Vec<f64>,
    laplacian: Array2<f64>,
}

impl Spectrum {
    pub fn new(mut eigenvalues: Vec<f64>, laplacian: Array2<f64>) -> Self {
        ops::sort_descending(&mut eigenvalues);
        Self {
            eigenvalues,
            laplacian,
        }
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    pub fn laplacian(&self) -> &Array2<f64> {
        &self.laplacian
    }

    /// Laplacian as row vectors, for consumers that do not speak `ndarray`.
    pub fn laplacian_rows(&self) -> Vec<Vec<f64>> {
        ops::to_rows(&self.laplacian)
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// `λ₀ - λ₁`, the gap between the two largest eigenvalues.
    pub fn spectral_gap(&self) -> Option<f64> {
        match self.eigenvalues.as_slice() {
            [first, second, ..] => Some(first - second),
            _ => None,
        }
    }

    /// Second-smallest eigenvalue (Fiedler value). Positive iff the graph is
    /// connected.
    pub fn algebraic_connectivity(&self) -> Option<f64> {
        let n = self.eigenvalues.len();
        (n >= 2).then(|| self.eigenvalues[n - 2])
    }

    /// Eigenvalues with `|λ| < eps`; for an undirected Laplacian this is the
    /// number of connected components.
    ///
    /// `eps` must cover the solver's error: closed forms and QR iteration are
    /// good to about `1e-6`, while the deflation chain used by default for
    /// orders ≥ 4 needs [`DEFLATION_EPS`](crate::DEFLATION_EPS).
    pub fn zero_count(&self, eps: f64) -> usize {
        self.eigenvalues.iter().filter(|l| l.abs() < eps).count()
    }

    pub fn is_positive_semidefinite(&self, eps: f64) -> bool {
        self.eigenvalues.iter().all(|&l| l >= -eps)
    }
}
