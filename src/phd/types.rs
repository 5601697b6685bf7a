//! Weighted Gaussian component
//!
//! The building block of every mixture in the filter. Uses runtime
//! dimensions (DVector/DMatrix) so the same code serves position-only and
//! position+velocity state spaces.

use crate::Real;
use nalgebra::{DMatrix, DVector};

/// Gaussian component with runtime dimensions.
///
/// In the PHD interpretation the weight is not a probability: it is the
/// expected number of targets represented by this component, and the
/// weights of a mixture sum to the expected target count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaussianComponent {
    /// Component weight (non-negative)
    pub weight: Real,
    /// Mean vector (state estimate)
    pub mean: DVector<Real>,
    /// Covariance matrix (uncertainty), symmetric positive semi-definite
    pub covariance: DMatrix<Real>,
}

impl GaussianComponent {
    /// Create a new Gaussian component
    pub fn new(weight: Real, mean: DVector<Real>, covariance: DMatrix<Real>) -> Self {
        Self {
            weight,
            mean,
            covariance,
        }
    }

    /// Create a zero-weighted component with zero mean and covariance
    pub fn zero(x_dim: usize) -> Self {
        Self {
            weight: 0.0,
            mean: DVector::zeros(x_dim),
            covariance: DMatrix::zeros(x_dim, x_dim),
        }
    }

    /// Reset to zero weight, zero mean and zero covariance, keeping the size
    pub fn clear(&mut self) {
        self.weight = 0.0;
        self.mean.fill(0.0);
        self.covariance.fill(0.0);
    }

    /// State dimension from the mean vector
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.mean.len()
    }
}
