//! # lapl-eigen
//!
//! Eigenvalues of small dense matrices, in particular graph Laplacians.
//!
//! ## The Core Idea
//!
//! The graph Laplacian L = D - A of an undirected graph is symmetric positive
//! semidefinite. Its spectrum encodes connectivity: the number of zero
//! eigenvalues is the number of connected components, and the second-smallest
//! eigenvalue measures how well-connected the graph is.
//!
//! ## Key Items
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`EigenvalueCalculator`] | Single entry point; picks a strategy by order |
//! | [`closed_form`] | Exact eigenvalues for orders ≤ 3 |
//! | [`power_iteration`] + [`deflate`] | Largest eigenpair, then remove it |
//! | [`householder::decompose`] | Householder QR, A = QR |
//! | [`qr_algorithm`] | Unshifted QR iteration for the full spectrum |
//! | [`Graph`] | Laplacian producer |
//!
//! ## Quick Start
//!
//! ```rust
//! use lapl_eigen::{EigenvalueCalculator, Graph, ToleranceConfig};
//!
//! // Triangle: 0 -- 1 -- 2 -- 0
//! let mut g = Graph::new(3);
//! g.add_edge(0, 1).unwrap();
//! g.add_edge(1, 2).unwrap();
//! g.add_edge(2, 0).unwrap();
//!
//! let mut calc = EigenvalueCalculator::seeded(ToleranceConfig::default(), 7);
//! let spectrum = g.spectrum(&mut calc).unwrap();
//! assert!((spectrum.eigenvalues()[0] - 3.0).abs() < 1e-9);
//! assert_eq!(spectrum.zero_count(1e-9), 1);
//! ```
//!
//! ## Strategies
//!
//! ```text
//! n = 0        empty
//! n = 1..=3    closed form (quadratic, Cardano)
//! n = 4        power iteration + deflation, 4 rounds, 200 steps each
//! n >= 5       power iteration + deflation, n rounds, 100 steps each
//! (any n)      unshifted QR iteration, on request
//! ```
//!
//! Results are always sorted largest first.
//!
//! ## What Can Go Wrong
//!
//! 1. **Malformed input**: non-square, ragged or non-finite matrices are
//!    rejected with an [`Error`]. This is the only hard failure.
//! 2. **Non-convergence**: iterative methods that run out of steps (or out
//!    of time, see [`ToleranceConfig::time_limit`]) return their current
//!    estimate. Close eigenvalues converge slowly.
//! 3. **Complex pairs**: real output only; the closed forms collapse a
//!    complex-conjugate pair to its real part.
//! 4. **Directed graphs**: asymmetric Laplacians are accepted, but the
//!    iterative solvers assume symmetry; treat their output as approximate.
//! 5. **Determinism**: power iteration starts from a random vector. Use
//!    [`EigenvalueCalculator::seeded`] for reproducible runs.

use ndarray::Array2;
use thiserror::Error;

pub mod calculator;
pub mod closed_form;
pub mod config;
pub mod deflation;
#[cfg(feature = "faer")]
pub mod dense;
pub mod graph;
pub mod householder;
pub mod ops;
pub mod power;
pub mod qr;
pub mod spectrum;

pub use calculator::{EigenvalueCalculator, Strategy, StrategyTable, DEFLATION_EPS};
pub use config::{Criteria, ToleranceConfig};
pub use deflation::deflate;
pub use graph::{adjacency_to_laplacian, connected_components, degree_matrix, Graph};
pub use householder::Qr;
pub use power::{power_iteration, EigenPair};
pub use qr::{qr_algorithm, QrOutcome};
pub use spectrum::Spectrum;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix is not square: {0} x {1}")]
    NotSquare(usize, usize),

    #[error("ragged matrix: row {row} has {len} entries, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("non-finite entry at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("no closed form for order {order} (max {max})")]
    UnsupportedOrder { order: usize, max: usize },

    #[error("node {node} out of bounds for graph with {n} nodes")]
    NodeOutOfBounds { node: usize, n: usize },

    #[error("backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Whether the input matrix itself was malformed (not square, ragged, or
    /// containing NaN/inf).
    pub fn is_invalid_matrix(&self) -> bool {
        matches!(
            self,
            Error::NotSquare(..) | Error::Ragged { .. } | Error::NonFinite { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Eigenvalues with the default configuration and an entropy-seeded start
/// vector, largest first.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<f64>> {
    EigenvalueCalculator::default().eigenvalues(a)
}
