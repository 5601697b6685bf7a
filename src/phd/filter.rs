//! GM-PHD filter façade
//!
//! Owns the configuration and every mixture involved in the recursion, and
//! orchestrates one full predict/update/prune cycle per
//! [`propagate`](GmPhdFilter::propagate) call. The filter carries no track
//! identities: extraction returns the components above a weight threshold,
//! nothing more.

use crate::phd::config::{DynamicsModel, ObservationModel, PruningConfig, SpawnModel};
use crate::phd::errors::FilterError;
use crate::phd::mixture::GaussianMixture;
use crate::phd::output::TrackedTargets;
use crate::phd::types::GaussianComponent;
use crate::phd::{prediction, update};
use crate::Real;
use nalgebra::{DMatrix, DVector, Matrix4};

/// Gaussian Mixture PHD multi-target tracker.
///
/// Single-threaded and non-reentrant: one `propagate` call is an atomic
/// unit, and distinct filter instances share nothing. The tracked mixture
/// survives across steps; every other mixture is per-step staging.
#[derive(Debug, Clone)]
pub struct GmPhdFilter {
    measure_dim: usize,
    x_dim: usize,
    motion_model: bool,
    verbose: bool,

    survival_probability: Real,
    dynamics: DynamicsModel,
    observation: ObservationModel,
    pruning: PruningConfig,
    birth_model: GaussianMixture,
    spawn_models: Vec<SpawnModel>,

    current_targets: GaussianMixture,
    expected_targets: GaussianMixture,
    birth_targets: GaussianMixture,
    spawn_targets: GaussianMixture,
    measurements: GaussianMixture,
    extracted_targets: GaussianMixture,
}

impl GmPhdFilter {
    /// Create a filter over `measure_dim`-dimensional measurements.
    ///
    /// With `motion_model` the state is position concatenated with velocity
    /// (`2 * measure_dim`); without it the state is the position alone.
    /// `max_components` bounds the mixture size after pruning, and `verbose`
    /// traces every stage of `propagate` to stdout.
    ///
    /// The filter starts with neutral models (identity dynamics and
    /// observation, no birth, no spawn, unit survival and detection); the
    /// `set_*` family refines them.
    pub fn new(max_components: usize, measure_dim: usize, motion_model: bool, verbose: bool) -> Self {
        let x_dim = if motion_model {
            2 * measure_dim
        } else {
            measure_dim
        };

        Self {
            measure_dim,
            x_dim,
            motion_model,
            verbose,
            survival_probability: 1.0,
            dynamics: DynamicsModel::constant_velocity(x_dim, measure_dim, 1.0, 0.0),
            observation: ObservationModel::isotropic(x_dim, measure_dim, 1.0, 1.0, 1.0, 0.0),
            pruning: PruningConfig {
                max_components,
                ..PruningConfig::default()
            },
            birth_model: GaussianMixture::new(x_dim, measure_dim),
            spawn_models: Vec::new(),
            current_targets: GaussianMixture::new(x_dim, measure_dim),
            expected_targets: GaussianMixture::new(x_dim, measure_dim),
            birth_targets: GaussianMixture::new(x_dim, measure_dim),
            spawn_targets: GaussianMixture::new(x_dim, measure_dim),
            measurements: GaussianMixture::new(x_dim, measure_dim),
            extracted_targets: GaussianMixture::new(x_dim, measure_dim),
        }
    }

    /// State dimension
    #[inline]
    pub fn x_dim(&self) -> usize {
        self.x_dim
    }

    /// Measurement (position) dimension
    #[inline]
    pub fn measure_dim(&self) -> usize {
        self.measure_dim
    }

    /// The tracked mixture after the most recent prune
    pub fn current_targets(&self) -> &GaussianMixture {
        &self.current_targets
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    fn check_component_dims(
        &self,
        component: &GaussianComponent,
        context: &str,
    ) -> Result<(), FilterError> {
        if component.x_dim() != self.x_dim
            || component.covariance.shape() != (self.x_dim, self.x_dim)
        {
            return Err(FilterError::DimensionMismatch {
                expected: self.x_dim,
                actual: component.x_dim(),
                context: context.to_string(),
            });
        }
        Ok(())
    }

    /// Set the components injected as spontaneous births every step.
    pub fn set_birth_model(
        &mut self,
        components: Vec<GaussianComponent>,
    ) -> Result<(), FilterError> {
        for component in &components {
            self.check_component_dims(component, "birth component")?;
        }

        self.birth_model.clear();
        for component in components {
            self.birth_model.push(component);
        }
        Ok(())
    }

    /// Set the spawn rules applied to every tracked target each step.
    pub fn set_spawn_models(&mut self, models: Vec<SpawnModel>) -> Result<(), FilterError> {
        for model in &models {
            if model.x_dim() != self.x_dim
                || model.transition.shape() != (self.x_dim, self.x_dim)
                || model.covariance.shape() != (self.x_dim, self.x_dim)
            {
                return Err(FilterError::DimensionMismatch {
                    expected: self.x_dim,
                    actual: model.x_dim(),
                    context: "spawn model".to_string(),
                });
            }
        }

        self.spawn_models = models;
        Ok(())
    }

    /// Configure constant-velocity dynamics from a sampling period and an
    /// isotropic process noise.
    pub fn set_dynamics_model(&mut self, sampling_period: Real, process_noise: Real) {
        self.dynamics = DynamicsModel::constant_velocity(
            self.x_dim,
            self.measure_dim,
            sampling_period,
            process_noise,
        );
    }

    /// Configure dynamics from user-supplied transition and process-noise
    /// matrices.
    pub fn set_dynamics_model_matrices(
        &mut self,
        transition: DMatrix<Real>,
        process_noise: DMatrix<Real>,
    ) -> Result<(), FilterError> {
        if transition.nrows() != self.x_dim {
            return Err(FilterError::DimensionMismatch {
                expected: self.x_dim,
                actual: transition.nrows(),
                context: "dynamics transition matrix".to_string(),
            });
        }
        self.dynamics = DynamicsModel::from_matrices(transition, process_noise)?;
        Ok(())
    }

    /// Configure the sensor: detection probability, isotropic pose/speed
    /// noise and the clutter (false detection) intensity.
    pub fn set_observation_model(
        &mut self,
        detection_probability: Real,
        noise_pose: Real,
        noise_speed: Real,
        clutter_intensity: Real,
    ) {
        self.observation = ObservationModel::isotropic(
            self.x_dim,
            self.measure_dim,
            detection_probability,
            noise_pose,
            noise_speed,
            clutter_intensity,
        );
    }

    /// Configure mixture reduction thresholds.
    pub fn set_pruning_parameters(
        &mut self,
        truncate_threshold: Real,
        merge_threshold: Real,
        max_components: usize,
    ) {
        self.pruning = PruningConfig {
            truncate_threshold,
            merge_threshold,
            max_components,
        };
    }

    /// Set the per-step target survival probability.
    pub fn set_survival_probability(&mut self, probability: Real) {
        self.survival_probability = probability;
    }

    // ------------------------------------------------------------------
    // Per-step inputs
    // ------------------------------------------------------------------

    /// Ingest the measurement set for the next step.
    ///
    /// `positions` and `speeds` are flat sequences of `measure_dim` values
    /// per detected target and must have equal lengths. Builds one weight-1
    /// measurement Gaussian per target with the observation noise as
    /// covariance.
    pub fn set_new_measurements(
        &mut self,
        positions: &[Real],
        speeds: &[Real],
    ) -> Result<(), FilterError> {
        if positions.len() % self.measure_dim != 0 {
            return Err(FilterError::DimensionMismatch {
                expected: self.measure_dim,
                actual: positions.len(),
                context: "measurement positions length (not a multiple of the measurement dimension)"
                    .to_string(),
            });
        }
        if speeds.len() != positions.len() {
            return Err(FilterError::DimensionMismatch {
                expected: positions.len(),
                actual: speeds.len(),
                context: "measurement speeds length".to_string(),
            });
        }

        self.measurements.clear();

        let num_targets = positions.len() / self.measure_dim;
        for target in 0..num_targets {
            let mut mean = DVector::zeros(self.x_dim);
            for i in 0..self.measure_dim {
                mean[i] = positions[target * self.measure_dim + i];
                if self.motion_model {
                    mean[self.measure_dim + i] = speeds[target * self.measure_dim + i];
                }
            }
            self.measurements.push(GaussianComponent::new(
                1.0,
                mean,
                self.observation.measurement_noise.clone(),
            ));
        }

        Ok(())
    }

    /// Move the tracked mixture into a new reference frame.
    ///
    /// Must not be interleaved with `propagate` on the same instance.
    pub fn set_new_referential(&mut self, transform: &Matrix4<Real>) {
        self.current_targets.change_referential(transform);
    }

    // ------------------------------------------------------------------
    // Recursion
    // ------------------------------------------------------------------

    /// Run one predict / update / prune cycle against the most recently
    /// ingested measurement set.
    ///
    /// # Errors
    /// [`FilterError::NumericalInstability`] when an innovation covariance
    /// turns non-finite or singular. The step is abandoned and the tracked
    /// mixture is left exactly as it was before the call.
    pub fn propagate(&mut self) -> Result<(), FilterError> {
        prediction::predict_birth(
            &self.current_targets,
            &self.birth_model,
            &self.spawn_models,
            &mut self.birth_targets,
            &mut self.spawn_targets,
        );

        prediction::predict_surviving(
            &self.current_targets,
            &self.dynamics,
            self.survival_probability,
            &mut self.expected_targets,
        );

        let components = prediction::build_update_components(
            &mut self.expected_targets,
            &self.birth_targets,
            &self.spawn_targets,
            &self.observation,
        )?;

        if self.verbose {
            self.trace_mixture("expected targets", &self.expected_targets);
        }

        let mut posterior = update::update_mixture(
            &self.expected_targets,
            &components,
            &self.measurements,
            &self.observation,
        );

        if self.verbose {
            self.trace_mixture("posterior (pre-prune)", &posterior);
        }

        posterior.prune(
            self.pruning.truncate_threshold,
            self.pruning.merge_threshold,
            self.pruning.max_components,
        );
        self.current_targets = posterior;

        if self.verbose {
            self.trace_mixture("pruned targets", &self.current_targets);
        }

        // The per-target Kalman quantities in `components` die here; the
        // next step recomputes them from scratch.
        Ok(())
    }

    // ------------------------------------------------------------------
    // Extraction
    // ------------------------------------------------------------------

    /// Fill the extracted mixture with every tracked component whose weight
    /// is at least `threshold` (clamped at zero).
    pub fn extract_targets(&mut self, threshold: Real) {
        let threshold = threshold.max(0.0);

        self.extracted_targets.clear();
        for gaussian in self.current_targets.iter() {
            if gaussian.weight >= threshold {
                self.extracted_targets.push(gaussian.clone());
            }
        }
    }

    /// Extract and flatten the targets above `threshold` into parallel
    /// position / speed / weight sequences.
    pub fn get_tracked_targets(&mut self, threshold: Real) -> TrackedTargets {
        self.extract_targets(threshold);

        let mut tracked = TrackedTargets::new(self.measure_dim);
        for gaussian in self.extracted_targets.iter() {
            for i in 0..self.measure_dim {
                tracked.positions.push(gaussian.mean[i]);
                tracked.speeds.push(if self.motion_model {
                    gaussian.mean[self.measure_dim + i]
                } else {
                    0.0
                });
            }
            tracked.weights.push(gaussian.weight);
        }
        tracked
    }

    /// Drop all tracked and extracted targets.
    pub fn reset(&mut self) {
        self.current_targets.clear();
        self.extracted_targets.clear();
    }

    fn trace_mixture(&self, label: &str, mixture: &GaussianMixture) {
        println!("gmphd: {} ({} components)", label, mixture.len());
        for (i, gaussian) in mixture.iter().enumerate() {
            let pos: Vec<String> = (0..self.measure_dim)
                .map(|j| format!("{:7.2}", gaussian.mean[j]))
                .collect();
            println!("  {:3} - pos {} - weight {:.4}", i, pos.join(" "), gaussian.weight);
        }
    }
}
