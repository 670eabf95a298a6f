//! Dense vector and matrix primitives.
//!
//! Thin wrappers over `ndarray` so the solvers read in terms of the
//! operations they need. Everything here is pure: inputs are borrowed and
//! results are freshly allocated.

use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1};

/// Matrix product `A·B`. Requires `a.ncols() == b.nrows()`.
pub fn multiply(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    debug_assert_eq!(a.ncols(), b.nrows(), "non-conforming product");
    a.dot(b)
}

/// Matrix-vector product `A·v`.
pub fn mat_vec(a: &Array2<f64>, v: &Array1<f64>) -> Array1<f64> {
    debug_assert_eq!(a.ncols(), v.len(), "non-conforming product");
    a.dot(v)
}

/// Inner product of two equal-length vectors.
pub fn dot(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.dot(&b)
}

/// Euclidean norm.
pub fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// The `n × n` identity matrix.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
///
/// let i = ops::identity(3);
/// assert_eq!(ops::trace(&i), 3.0);
/// assert!(ops::identity(0).is_empty());
/// ```
pub fn identity(n: usize) -> Array2<f64> {
    Array2::eye(n)
}

/// Owned transpose `Aᵗ`.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::array;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// assert_eq!(ops::transpose(&a), array![[1.0, 3.0], [2.0, 4.0]]);
/// ```
pub fn transpose(a: &Array2<f64>) -> Array2<f64> {
    a.t().to_owned()
}

/// Outer product `u·vᵗ`.
pub fn outer(u: &Array1<f64>, v: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((u.len(), v.len()), |(i, j)| u[i] * v[j])
}

/// Sum of the diagonal. For a graph Laplacian this is twice the edge count
/// (undirected) and also the sum of the eigenvalues.
///
/// # Arguments
///
/// * `a` - Square matrix. Only the diagonal is read.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::array;
///
/// let l = array![[1.0, -1.0], [-1.0, 1.0]];
/// assert_eq!(ops::trace(&l), 2.0);
/// ```
pub fn trace(a: &Array2<f64>) -> f64 {
    a.diag().sum()
}

/// Build a matrix from row vectors.
///
/// Rows must all have the same length. An empty slice gives a `0 × 0`
/// matrix.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::array;
///
/// let a = ops::from_rows(&[vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
/// assert_eq!(a, array![[1.0, -1.0], [-1.0, 1.0]]);
/// assert!(ops::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
/// ```
pub fn from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    for (row, r) in rows.iter().enumerate() {
        if r.len() != n_cols {
            return Err(Error::Ragged {
                row,
                len: r.len(),
                expected: n_cols,
            });
        }
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| Error::Backend(e.to_string()))
}

/// Convert back to row vectors (the shape the display layer consumes).
pub fn to_rows(a: &Array2<f64>) -> Vec<Vec<f64>> {
    a.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Order of a square matrix.
///
/// # Arguments
///
/// * `a` - Any 2-D array.
///
/// # Errors
///
/// [`Error::NotSquare`] with the row and column counts when they differ.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::Array2;
///
/// assert_eq!(ops::ensure_square(&Array2::<f64>::zeros((3, 3))).unwrap(), 3);
/// assert!(ops::ensure_square(&Array2::<f64>::zeros((2, 3))).is_err());
/// ```
pub fn ensure_square(a: &Array2<f64>) -> Result<usize> {
    let (n, m) = a.dim();
    if n != m {
        return Err(Error::NotSquare(n, m));
    }
    Ok(n)
}

/// Square and finite: the boundary check every public solver runs.
///
/// Returns the order `n`.
///
/// # Errors
///
/// [`Error::NotSquare`] or [`Error::NonFinite`] (first offending entry in
/// row-major order).
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::array;
///
/// assert_eq!(ops::validate(&array![[0.0, 1.0], [1.0, 0.0]]).unwrap(), 2);
/// assert!(ops::validate(&array![[f64::NAN]]).unwrap_err().is_invalid_matrix());
/// ```
pub fn validate(a: &Array2<f64>) -> Result<usize> {
    let n = ensure_square(a)?;
    if let Some(((row, col), _)) = a.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(Error::NonFinite { row, col });
    }
    Ok(n)
}

/// Whether `|a_ij - a_ji| <= tol` for every pair. Non-square input is never
/// symmetric.
///
/// # Arguments
///
/// * `a` - Matrix to check.
/// * `tol` - Largest tolerated difference between mirrored entries.
///
/// # Example
///
/// ```
/// use lapl_eigen::ops;
/// use ndarray::array;
///
/// assert!(ops::is_symmetric(&array![[2.0, -1.0], [-1.0, 2.0]], 0.0));
/// // Laplacian of the directed edge 0 -> 1.
/// assert!(!ops::is_symmetric(&array![[1.0, -1.0], [0.0, 0.0]], 1e-10));
/// ```
pub fn is_symmetric(a: &Array2<f64>, tol: f64) -> bool {
    let n = a.nrows();
    if n != a.ncols() {
        return false;
    }
    (0..n).all(|i| ((i + 1)..n).all(|j| (a[[i, j]] - a[[j, i]]).abs() <= tol))
}

/// Largest absolute entry difference, `max |a_ij - b_ij|`.
pub fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Sort in place, largest first.
pub fn sort_descending(values: &mut [f64]) {
    values.sort_by(|a, b| b.total_cmp(a));
}
