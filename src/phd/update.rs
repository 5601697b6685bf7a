//! Update stage
//!
//! Expands the predicted mixture against the measurement set. With `T`
//! predicted targets and `M` measurements the posterior holds exactly
//! `(M+1) * T` hypotheses, indexed `m * T + t`: block `m = 0` carries the
//! missed-detection hypotheses, block `m >= 1` the pairings of measurement
//! `m` with every predicted target. Each detection block is normalized with
//! the clutter intensity as additive offset; the miss block is not.

use crate::common::linalg;
use crate::phd::config::ObservationModel;
use crate::phd::mixture::GaussianMixture;
use crate::phd::prediction::UpdateComponents;
use crate::phd::types::GaussianComponent;

/// Measurement-conditioned Bayesian update of the predicted mixture.
///
/// `expected` is the predicted mixture laid out by
/// [`build_update_components`](crate::phd::prediction::build_update_components),
/// `components` the matching Kalman quantities, and `measurements` the
/// current measurement set (one weight-1 Gaussian per detection).
///
/// Birth components get a zero miss weight: they only enter the posterior
/// through a detection. With no measurements only the miss block is
/// produced.
pub fn update_mixture(
    expected: &GaussianMixture,
    components: &UpdateComponents,
    measurements: &GaussianMixture,
    observation: &ObservationModel,
) -> GaussianMixture {
    let num_predicted = expected.len();
    let num_measurements = measurements.len();
    let detection_probability = observation.detection_probability;

    let mut posterior = GaussianMixture::new(expected.x_dim(), expected.measure_dim());
    posterior
        .components
        .reserve((num_measurements + 1) * num_predicted);

    // Miss hypotheses: predicted targets carried through undetected
    for (t, gaussian) in expected.iter().enumerate() {
        let weight = if components.birth_indices.binary_search(&t).is_ok() {
            0.0
        } else {
            (1.0 - detection_probability) * gaussian.weight
        };
        posterior.push(GaussianComponent::new(
            weight,
            gaussian.mean.clone(),
            gaussian.covariance.clone(),
        ));
    }

    // Detection hypotheses: every (measurement, predicted target) pairing
    for m in 1..=num_measurements {
        let measurement = &measurements.components[m - 1].mean;

        for (t, gaussian) in expected.iter().enumerate() {
            let likelihood = linalg::gaussian_density(
                measurement,
                &components.predicted_measurements[t],
                &components.innovation_covariances[t],
                observation.measure_dim,
            );

            let innovation = measurement - &components.predicted_measurements[t];

            posterior.push(GaussianComponent::new(
                detection_probability * gaussian.weight * likelihood,
                &gaussian.mean + &components.gains[t] * innovation,
                components.posterior_covariances[t].clone(),
            ));
        }

        // Normalize this measurement's slice, clutter as additive offset
        posterior.normalize_range(
            observation.clutter_intensity,
            m * num_predicted,
            (m + 1) * num_predicted,
            1,
        );
    }

    posterior
}
