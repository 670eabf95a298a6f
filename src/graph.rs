//! Graphs and their Laplacians.
//!
//! The engine only ever sees a square matrix; this module is the producer
//! side of that contract. A [`Graph`] is a plain value (nodes `0..n` plus an
//! edge list) that the caller owns and hands to the calculator.
//!
//! ## Degree convention
//!
//! ```text
//! undirected:  deg(i) = Σ_j A[i][j]     (A symmetric)
//! directed:    deg(i) = out-degree(i)   (row sum of a non-symmetric A)
//! L[i][i] = deg(i),  L[i][j] = -A[i][j]
//! ```
//!
//! Directed Laplacians are generally asymmetric. The iterative solvers do
//! not guarantee accuracy for them; see [`crate::calculator`].

use crate::calculator::EigenvalueCalculator;
use crate::spectrum::Spectrum;
use crate::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;

/// An unweighted graph on nodes `0..n`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    n: usize,
    directed: bool,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Undirected graph with `n` isolated nodes.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            directed: false,
            edges: Vec::new(),
        }
    }

    /// Directed graph with `n` isolated nodes.
    pub fn directed(n: usize) -> Self {
        Self {
            n,
            directed: true,
            edges: Vec::new(),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self) -> usize {
        self.n += 1;
        self.n - 1
    }

    /// Add the edge `u -> v` (or `u -- v` when undirected).
    ///
    /// Self loops and duplicates are ignored; returns whether the edge was
    /// new.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool> {
        for node in [u, v] {
            if node >= self.n {
                return Err(Error::NodeOutOfBounds { node, n: self.n });
            }
        }
        if u == v || self.has_edge(u, v) {
            return Ok(false);
        }
        self.edges.push((u, v));
        Ok(true)
    }

    /// Remove an edge if present; returns whether anything was removed.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let before = self.edges.len();
        let directed = self.directed;
        self.edges
            .retain(|&(a, b)| !((a, b) == (u, v) || (!directed && (a, b) == (v, u))));
        self.edges.len() != before
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges
            .iter()
            .any(|&(a, b)| (a, b) == (u, v) || (!self.directed && (a, b) == (v, u)))
    }

    /// 0/1 adjacency matrix; symmetric for undirected graphs.
    pub fn adjacency(&self) -> Array2<f64> {
        let mut adj = Array2::zeros((self.n, self.n));
        for &(u, v) in &self.edges {
            adj[[u, v]] = 1.0;
            if !self.directed {
                adj[[v, u]] = 1.0;
            }
        }
        adj
    }

    /// Node degrees: total degree when undirected, out-degree when directed.
    pub fn degrees(&self) -> Array1<f64> {
        degree_vector(&self.adjacency())
    }

    /// `L = D - A`.
    pub fn laplacian(&self) -> Array2<f64> {
        adjacency_to_laplacian(&self.adjacency())
    }

    /// Number of (weakly) connected components.
    pub fn connected_components(&self) -> usize {
        connected_components(&self.adjacency())
    }

    /// Eigenvalues of the Laplacian, bundled with the Laplacian itself.
    pub fn spectrum<R: Rng>(&self, calculator: &mut EigenvalueCalculator<R>) -> Result<Spectrum> {
        let laplacian = self.laplacian();
        let eigenvalues = calculator.eigenvalues(&laplacian)?;
        Ok(Spectrum::new(eigenvalues, laplacian))
    }
}

/// Degree vector: row sums of a (weighted) adjacency matrix.
pub fn degree_vector(adj: &Array2<f64>) -> Array1<f64> {
    adj.sum_axis(Axis(1))
}

/// Diagonal degree matrix D.
pub fn degree_matrix(adj: &Array2<f64>) -> Array2<f64> {
    Array2::from_diag(&degree_vector(adj))
}

/// Unnormalized Laplacian: L = D - A
///
/// For a symmetric non-negative `adj` the result is symmetric positive
/// semidefinite, has zero row sums, and its number of zero eigenvalues
/// equals the number of connected components.
pub fn adjacency_to_laplacian(adj: &Array2<f64>) -> Array2<f64> {
    let d = degree_matrix(adj);
    &d - adj
}

/// Number of weakly connected components (edges followed both ways).
pub fn connected_components(adj: &Array2<f64>) -> usize {
    let n = adj.nrows();
    let mut visited = vec![false; n];
    let mut components = 0;

    for start in 0..n {
        if visited[start] {
            continue;
        }
        components += 1;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            for j in 0..n {
                if !visited[j] && (adj[[node, j]] != 0.0 || adj[[j, node]] != 0.0) {
                    stack.push(j);
                }
            }
        }
    }

    components
}
