//! Configuration types for the filter
//!
//! Plain-data models for target dynamics, the sensor, spawning and mixture
//! reduction. No polymorphism: every model is a matrix/scalar bundle the
//! recursion consumes directly.

use crate::phd::errors::FilterError;
use crate::phd::types::GaussianComponent;
use crate::Real;
use nalgebra::{DMatrix, DVector};

/// Target dynamics for the prediction step
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicsModel {
    /// State transition matrix (F)
    pub transition_matrix: DMatrix<Real>,
    /// Process noise covariance (Q)
    pub process_noise: DMatrix<Real>,
}

impl DynamicsModel {
    /// Constant-velocity dynamics.
    ///
    /// `F` is the identity with the sampling period in the
    /// position-to-velocity coupling block (only present when the state
    /// carries velocities, i.e. `x_dim == 2 * z_dim`), and
    /// `Q = process_noise^2 * I`.
    pub fn constant_velocity(
        x_dim: usize,
        z_dim: usize,
        sampling_period: Real,
        process_noise: Real,
    ) -> Self {
        let mut f = DMatrix::identity(x_dim, x_dim);
        if x_dim == 2 * z_dim {
            for i in 0..z_dim {
                f[(i, z_dim + i)] = sampling_period;
            }
        }

        let q = DMatrix::identity(x_dim, x_dim) * (process_noise * process_noise);

        Self {
            transition_matrix: f,
            process_noise: q,
        }
    }

    /// User-supplied transition and process-noise matrices.
    pub fn from_matrices(
        transition_matrix: DMatrix<Real>,
        process_noise: DMatrix<Real>,
    ) -> Result<Self, FilterError> {
        if !transition_matrix.is_square() {
            return Err(FilterError::Configuration {
                description: "transition matrix must be square".to_string(),
            });
        }
        if process_noise.shape() != transition_matrix.shape() {
            return Err(FilterError::DimensionMismatch {
                expected: transition_matrix.nrows(),
                actual: process_noise.nrows(),
                context: "process noise covariance".to_string(),
            });
        }

        Ok(Self {
            transition_matrix,
            process_noise,
        })
    }

    /// State dimension
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.transition_matrix.nrows()
    }
}

/// Sensor observation model
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationModel {
    /// Observation matrix (H), identity over the state
    pub observation_matrix: DMatrix<Real>,
    /// Measurement noise covariance (R)
    pub measurement_noise: DMatrix<Real>,
    /// Detection probability
    pub detection_probability: Real,
    /// Clutter (false detection) intensity, the additive offset of the
    /// per-measurement weight normalization
    pub clutter_intensity: Real,
    /// Measurement (position) dimension
    pub measure_dim: usize,
}

impl ObservationModel {
    /// Isotropic observation model.
    ///
    /// `H = I` and `R = I` with the leading position block scaled by
    /// `noise_pose^2` and, when the state carries velocities, the trailing
    /// speed block scaled by `noise_speed^2`.
    pub fn isotropic(
        x_dim: usize,
        z_dim: usize,
        detection_probability: Real,
        noise_pose: Real,
        noise_speed: Real,
        clutter_intensity: Real,
    ) -> Self {
        let h = DMatrix::identity(x_dim, x_dim);

        let mut r = DMatrix::identity(x_dim, x_dim);
        for i in 0..z_dim.min(x_dim) {
            r[(i, i)] = noise_pose * noise_pose;
        }
        if x_dim == 2 * z_dim {
            for i in z_dim..x_dim {
                r[(i, i)] = noise_speed * noise_speed;
            }
        }

        Self {
            observation_matrix: h,
            measurement_noise: r,
            detection_probability,
            clutter_intensity,
            measure_dim: z_dim,
        }
    }

    /// State dimension
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.observation_matrix.ncols()
    }
}

/// Spawning rule: how an existing target seeds a derived one.
///
/// A child spawned from parent `p` has weight `p.weight * weight`, mean
/// `offset + transition * p.mean` and covariance
/// `covariance + transition * p.covariance * transition^T`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnModel {
    /// Offset added to the transformed parent mean
    pub offset: DVector<Real>,
    /// Linear map from parent state to child state
    pub transition: DMatrix<Real>,
    /// Covariance added on top of the transformed parent covariance
    pub covariance: DMatrix<Real>,
    /// Weight multiplier relative to the parent weight
    pub weight: Real,
}

impl SpawnModel {
    /// Create a new spawn rule
    pub fn new(
        offset: DVector<Real>,
        transition: DMatrix<Real>,
        covariance: DMatrix<Real>,
        weight: Real,
    ) -> Self {
        Self {
            offset,
            transition,
            covariance,
            weight,
        }
    }

    /// Spawn a child component from a parent
    pub fn spawn_from(&self, parent: &GaussianComponent) -> GaussianComponent {
        GaussianComponent::new(
            parent.weight * self.weight,
            &self.offset + &self.transition * &parent.mean,
            &self.covariance
                + &self.transition * &parent.covariance * self.transition.transpose(),
        )
    }

    /// State dimension
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.offset.len()
    }
}

/// Mixture reduction thresholds
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PruningConfig {
    /// Minimum weight a component needs to survive pruning
    pub truncate_threshold: Real,
    /// Squared Mahalanobis position distance below which components merge
    pub merge_threshold: Real,
    /// Hard upper bound on the mixture size after pruning
    pub max_components: usize,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            truncate_threshold: 1e-4,
            merge_threshold: 4.0,
            max_components: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Real = 1e-6;

    #[test]
    fn test_constant_velocity_dynamics() {
        let dynamics = DynamicsModel::constant_velocity(6, 3, 0.5, 0.1);

        assert_eq!(dynamics.x_dim(), 6);
        assert!((dynamics.transition_matrix[(0, 3)] - 0.5).abs() < TOL);
        assert!((dynamics.transition_matrix[(2, 5)] - 0.5).abs() < TOL);
        assert!((dynamics.transition_matrix[(3, 0)]).abs() < TOL);
        assert!((dynamics.process_noise[(4, 4)] - 0.01).abs() < TOL);
    }

    #[test]
    fn test_position_only_dynamics_has_no_coupling() {
        let dynamics = DynamicsModel::constant_velocity(3, 3, 1.0, 0.0);
        assert_eq!(dynamics.transition_matrix, DMatrix::identity(3, 3));
    }

    #[test]
    fn test_from_matrices_rejects_mismatched_noise() {
        let result = DynamicsModel::from_matrices(DMatrix::identity(6, 6), DMatrix::identity(4, 4));
        assert!(matches!(result, Err(FilterError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_isotropic_observation_blocks() {
        let obs = ObservationModel::isotropic(6, 3, 0.9, 2.0, 0.5, 1.0);

        assert_eq!(obs.x_dim(), 6);
        assert!((obs.measurement_noise[(0, 0)] - 4.0).abs() < TOL);
        assert!((obs.measurement_noise[(5, 5)] - 0.25).abs() < TOL);
        assert_eq!(obs.observation_matrix, DMatrix::identity(6, 6));
    }

    #[test]
    fn test_spawn_from_parent() {
        let model = SpawnModel::new(
            DVector::from_vec(vec![1.0, 0.0, 0.0]),
            DMatrix::identity(3, 3) * 2.0,
            DMatrix::identity(3, 3),
            0.1,
        );
        let parent = GaussianComponent::new(
            0.5,
            DVector::from_vec(vec![1.0, 1.0, 1.0]),
            DMatrix::identity(3, 3),
        );

        let child = model.spawn_from(&parent);

        assert!((child.weight - 0.05).abs() < TOL);
        assert!((child.mean[0] - 3.0).abs() < TOL);
        assert!((child.mean[1] - 2.0).abs() < TOL);
        // covariance + transition * parent_cov * transition^T = I + 4I = 5I
        assert!((child.covariance[(0, 0)] - 5.0).abs() < TOL);
    }
}
