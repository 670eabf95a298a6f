//! Reference eigenvalues via `faer`'s dense self-adjoint eigensolver.
//!
//! Only the lower triangle is read, so the input is treated as symmetric.
//! Useful as a cross-check for the iterative strategies on undirected
//! Laplacians.

use crate::ops::{self, sort_descending};
use crate::{Error, Result};
use faer::{Mat, Side};
use ndarray::Array2;

/// Eigenvalues of a symmetric matrix, largest first.
pub fn symmetric_eigenvalues(a: &Array2<f64>) -> Result<Vec<f64>> {
    let n = ops::validate(a)?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let m = Mat::<f64>::from_fn(n, n, |i, j| a[[i, j]]);
    let mut eigenvalues = m
        .self_adjoint_eigenvalues(Side::Lower)
        .map_err(|e| Error::Backend(format!("faer self_adjoint_eigenvalues: {e:?}")))?;
    sort_descending(&mut eigenvalues);
    Ok(eigenvalues)
}
