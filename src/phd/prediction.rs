//! Prediction stage
//!
//! Builds the predicted mixture for one step: surviving targets pushed
//! through the dynamics, spontaneous births copied from the birth model and
//! spawned targets derived from every current target. Also precomputes the
//! per-target Kalman quantities the update stage consumes.

use crate::common::linalg;
use crate::phd::config::{DynamicsModel, ObservationModel, SpawnModel};
use crate::phd::errors::FilterError;
use crate::phd::mixture::GaussianMixture;
use crate::phd::types::GaussianComponent;
use crate::Real;
use nalgebra::{DMatrix, DVector};
use smallvec::SmallVec;

/// Per-predicted-target Kalman quantities, recomputed every step.
///
/// For predicted target `i`: the predicted measurement `z_bar = H * mu`,
/// the innovation covariance `S = R + H * Sigma * H^T`, the Kalman gain
/// `K = Sigma * H^T * S^-1` and the posterior covariance
/// `P = (I - K * H) * Sigma`. `birth_indices` records where the birth
/// components were appended into the predicted mixture; the update stage
/// zeroes their miss hypotheses.
#[derive(Debug, Clone)]
pub struct UpdateComponents {
    /// Indices of the birth components within the predicted mixture
    pub birth_indices: SmallVec<[usize; 8]>,
    /// Predicted measurements, one per predicted target
    pub predicted_measurements: Vec<DVector<Real>>,
    /// Innovation covariances, one per predicted target
    pub innovation_covariances: Vec<DMatrix<Real>>,
    /// Kalman gains, one per predicted target
    pub gains: Vec<DMatrix<Real>>,
    /// Posterior covariances, one per predicted target
    pub posterior_covariances: Vec<DMatrix<Real>>,
}

/// Stage birth and spawn components for this step.
///
/// Clears both staging mixtures, copies the birth model into
/// `birth_targets` and appends one spawned component per
/// (current target, spawn rule) pair to `spawn_targets`.
pub fn predict_birth(
    current: &GaussianMixture,
    birth_model: &GaussianMixture,
    spawn_models: &[SpawnModel],
    birth_targets: &mut GaussianMixture,
    spawn_targets: &mut GaussianMixture,
) {
    birth_targets.clear();
    spawn_targets.clear();

    for gaussian in birth_model.iter() {
        birth_targets.push(gaussian.clone());
    }

    for parent in current.iter() {
        for model in spawn_models {
            spawn_targets.push(model.spawn_from(parent));
        }
    }
}

/// Predict the surviving targets through the dynamics.
///
/// For every current component: weight scaled by the survival probability,
/// mean mapped through `F`, covariance propagated as `Q + F * Sigma * F^T`.
/// The output keeps the order of `current`.
pub fn predict_surviving(
    current: &GaussianMixture,
    dynamics: &DynamicsModel,
    survival_probability: Real,
    expected: &mut GaussianMixture,
) {
    expected.clear();

    let f = &dynamics.transition_matrix;
    for gaussian in current.iter() {
        expected.push(GaussianComponent::new(
            survival_probability * gaussian.weight,
            f * &gaussian.mean,
            &dynamics.process_noise + f * &gaussian.covariance * f.transpose(),
        ));
    }
}

/// Finalize the predicted mixture and precompute the update quantities.
///
/// Appends the staged birth components (recording their indices) and then
/// the spawned components to `expected`, so the layout is
/// `[surviving | births | spawns]`. Then computes [`UpdateComponents`] for
/// every predicted target.
///
/// # Errors
/// [`FilterError::NumericalInstability`] if any innovation covariance is
/// non-finite or not invertible; the caller must abandon the step.
pub fn build_update_components(
    expected: &mut GaussianMixture,
    birth_targets: &GaussianMixture,
    spawn_targets: &GaussianMixture,
    observation: &ObservationModel,
) -> Result<UpdateComponents, FilterError> {
    let mut birth_indices = SmallVec::new();
    for i in 0..birth_targets.len() {
        birth_indices.push(expected.len() + i);
    }

    for gaussian in birth_targets.iter() {
        expected.push(gaussian.clone());
    }
    for gaussian in spawn_targets.iter() {
        expected.push(gaussian.clone());
    }

    let num_predicted = expected.len();
    let x_dim = expected.x_dim();
    let h = &observation.observation_matrix;
    let identity = DMatrix::identity(x_dim, x_dim);

    let mut predicted_measurements = Vec::with_capacity(num_predicted);
    let mut innovation_covariances = Vec::with_capacity(num_predicted);
    let mut gains = Vec::with_capacity(num_predicted);
    let mut posterior_covariances = Vec::with_capacity(num_predicted);

    for gaussian in expected.iter() {
        let innovation =
            &observation.measurement_noise + h * &gaussian.covariance * h.transpose();

        if !innovation.iter().all(|v| v.is_finite()) {
            return Err(FilterError::NumericalInstability {
                description: "non-finite innovation covariance".to_string(),
            });
        }

        let innovation_inverse = match innovation.clone().try_inverse() {
            Some(inv) => inv,
            None => {
                return Err(FilterError::NumericalInstability {
                    description: "singular innovation covariance".to_string(),
                })
            }
        };

        let gain = &gaussian.covariance * h.transpose() * innovation_inverse;
        let posterior = linalg::symmetrize(&((&identity - &gain * h) * &gaussian.covariance));

        predicted_measurements.push(h * &gaussian.mean);
        innovation_covariances.push(innovation);
        gains.push(gain);
        posterior_covariances.push(posterior);
    }

    Ok(UpdateComponents {
        birth_indices,
        predicted_measurements,
        innovation_covariances,
        gains,
        posterior_covariances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Real = 1e-5;

    fn unit_component(weight: Real, x: Real) -> GaussianComponent {
        let mut mean = DVector::zeros(6);
        mean[0] = x;
        GaussianComponent::new(weight, mean, DMatrix::identity(6, 6))
    }

    #[test]
    fn test_predict_birth_stages_births_and_spawns() {
        let mut current = GaussianMixture::new(6, 3);
        current.push(unit_component(0.5, 0.0));
        current.push(unit_component(0.3, 10.0));

        let mut birth_model = GaussianMixture::new(6, 3);
        birth_model.push(unit_component(0.2, 0.0));

        let spawn_models = vec![SpawnModel::new(
            DVector::zeros(6),
            DMatrix::identity(6, 6),
            DMatrix::identity(6, 6),
            0.05,
        )];

        let mut birth_targets = GaussianMixture::new(6, 3);
        let mut spawn_targets = GaussianMixture::new(6, 3);
        // Stale content must be cleared
        birth_targets.push(unit_component(9.0, 9.0));

        predict_birth(
            &current,
            &birth_model,
            &spawn_models,
            &mut birth_targets,
            &mut spawn_targets,
        );

        assert_eq!(birth_targets.len(), 1);
        assert_eq!(spawn_targets.len(), 2);
        assert!((spawn_targets.components[0].weight - 0.025).abs() < TOL);
        assert!((spawn_targets.components[1].weight - 0.015).abs() < TOL);
    }

    #[test]
    fn test_predict_surviving_applies_dynamics() {
        let mut current = GaussianMixture::new(6, 3);
        let mut moving = unit_component(0.5, 1.0);
        moving.mean[3] = 2.0; // velocity along x
        current.push(moving);

        let dynamics = DynamicsModel::constant_velocity(6, 3, 1.0, 0.1);
        let mut expected = GaussianMixture::new(6, 3);

        predict_surviving(&current, &dynamics, 0.9, &mut expected);

        assert_eq!(expected.len(), 1);
        let predicted = &expected.components[0];
        assert!((predicted.weight - 0.45).abs() < TOL);
        // x + dt * vx
        assert!((predicted.mean[0] - 3.0).abs() < TOL);
        assert!((predicted.mean[3] - 2.0).abs() < TOL);
        // Q + F * I * F^T inflates the position variance by the coupling
        assert!((predicted.covariance[(0, 0)] - 2.01).abs() < TOL);
    }

    #[test]
    fn test_build_update_layout_and_kalman_terms() {
        let mut expected = GaussianMixture::new(6, 3);
        expected.push(unit_component(0.5, 0.0));

        let mut birth_targets = GaussianMixture::new(6, 3);
        birth_targets.push(unit_component(0.2, 5.0));
        let spawn_targets = GaussianMixture::new(6, 3);

        let observation = ObservationModel::isotropic(6, 3, 0.9, 1.0, 1.0, 0.0);

        let components =
            build_update_components(&mut expected, &birth_targets, &spawn_targets, &observation)
                .unwrap();

        // Layout: surviving then birth
        assert_eq!(expected.len(), 2);
        assert_eq!(components.birth_indices.as_slice(), &[1]);
        assert!((expected.components[1].mean[0] - 5.0).abs() < TOL);

        // With H = I, R = I, Sigma = I: S = 2I, K = 0.5I, P = 0.5I
        assert!((components.innovation_covariances[0][(0, 0)] - 2.0).abs() < TOL);
        assert!((components.gains[0][(0, 0)] - 0.5).abs() < TOL);
        assert!((components.posterior_covariances[0][(0, 0)] - 0.5).abs() < TOL);
        assert!((components.predicted_measurements[0][0]).abs() < TOL);
    }

    #[test]
    fn test_build_update_rejects_non_finite_innovation() {
        let mut expected = GaussianMixture::new(6, 3);
        let mut bad = unit_component(0.5, 0.0);
        bad.covariance[(0, 0)] = Real::NAN;
        expected.push(bad);

        let birth_targets = GaussianMixture::new(6, 3);
        let spawn_targets = GaussianMixture::new(6, 3);
        let observation = ObservationModel::isotropic(6, 3, 0.9, 1.0, 1.0, 0.0);

        let result =
            build_update_components(&mut expected, &birth_targets, &spawn_targets, &observation);

        assert!(matches!(
            result,
            Err(FilterError::NumericalInstability { .. })
        ));
    }
}
