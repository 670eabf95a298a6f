//! Hotelling deflation: `A' = A - λ·v·vᵗ`.
//!
//! For symmetric `A` and unit `v` with `Av = λv`, `A'` keeps every other
//! eigenpair of `A` and sends `λ` to zero, so the next power iteration finds
//! the next-largest eigenvalue.

use crate::ops;
use crate::power::EigenPair;
use ndarray::Array2;

/// Remove `pair` from the spectrum of `a`. `pair.vector` must be unit-norm.
///
/// # Example
///
/// ```
/// use lapl_eigen::{deflate, EigenPair};
/// use ndarray::array;
///
/// let a = array![[3.0, 0.0], [0.0, 1.0]];
/// let pair = EigenPair { value: 3.0, vector: array![1.0, 0.0] };
/// assert_eq!(deflate(&a, &pair), array![[0.0, 0.0], [0.0, 1.0]]);
/// ```
pub fn deflate(a: &Array2<f64>, pair: &EigenPair) -> Array2<f64> {
    debug_assert_eq!(a.nrows(), pair.vector.len());
    a - &(ops::outer(&pair.vector, &pair.vector) * pair.value)
}
