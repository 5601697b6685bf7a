//! Linear algebra utilities
//!
//! Gaussian density evaluation, Mahalanobis distances and small matrix
//! helpers required by the PHD recursion. All block-based functions operate
//! on the leading `d x d` block of the covariance and the leading `d`
//! entries of the vectors, which is how the filter restricts likelihoods and
//! merge distances to the position subspace.

use crate::Real;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::TAU;

/// Evaluate a multivariate normal PDF over the leading `d` dimensions.
///
/// Uses the leading `d` entries of `x` and `mu` and the leading `d x d`
/// block of `sigma`. Singular or non-finite covariance blocks yield a
/// density of 0 rather than an error; the update stage relies on this to
/// keep degenerate hypotheses harmless.
///
/// # Arguments
/// * `x` - Point to evaluate
/// * `mu` - Mean vector
/// * `sigma` - Covariance matrix (only the leading block is read)
/// * `d` - Number of leading dimensions to use
///
/// # Returns
/// Probability density value, 0 for degenerate covariance
pub fn gaussian_density(x: &DVector<Real>, mu: &DVector<Real>, sigma: &DMatrix<Real>, d: usize) -> Real {
    let block = sigma.view((0, 0), (d, d)).into_owned();

    let det = block.determinant();
    if det == 0.0 || !det.is_finite() {
        return 0.0;
    }

    let inverse = match block.try_inverse() {
        Some(inv) => inv,
        None => return 0.0,
    };

    let diff = x.rows(0, d).into_owned() - mu.rows(0, d).into_owned();
    let exponent = -0.5 * diff.dot(&(&inverse * &diff));

    let norm = ((TAU as Real).powi(d as i32) * det.abs()).sqrt();
    exponent.exp() / norm
}

/// 3-D multivariate normal PDF.
///
/// Shorthand for [`gaussian_density`] with `d = 3`, the position-space
/// likelihood used by the measurement update.
#[inline]
pub fn gaussian_density3(x: &DVector<Real>, mu: &DVector<Real>, sigma: &DMatrix<Real>) -> Real {
    gaussian_density(x, mu, sigma, 3)
}

/// Squared Mahalanobis distance over the leading `d` dimensions.
///
/// `(x - mu)^T * Sigma^-1 * (x - mu)` restricted to the leading block.
/// Returns infinity when the covariance block is not invertible, so a
/// degenerate reference component never captures its neighbours.
pub fn mahalanobis_squared(
    x: &DVector<Real>,
    mu: &DVector<Real>,
    sigma: &DMatrix<Real>,
    d: usize,
) -> Real {
    let block = sigma.view((0, 0), (d, d)).into_owned();

    let inverse = match block.try_inverse() {
        Some(inv) => inv,
        None => return Real::INFINITY,
    };

    let diff = x.rows(0, d).into_owned() - mu.rows(0, d).into_owned();
    diff.dot(&(&inverse * &diff))
}

/// Make a matrix symmetric by averaging with its transpose.
///
/// Covariance updates of the form `(I - K H) * Sigma` can drift off
/// symmetry in floating point; this restores the invariant.
pub fn symmetrize(matrix: &DMatrix<Real>) -> DMatrix<Real> {
    (matrix + matrix.transpose()) * 0.5
}

/// Check if a matrix is positive definite via Cholesky decomposition.
pub fn is_positive_definite(matrix: &DMatrix<Real>) -> bool {
    matrix.clone().cholesky().is_some()
}
