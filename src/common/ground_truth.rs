//! Ground truth and measurement generation
//!
//! Synthesizes constant-velocity target trajectories and the noisy,
//! cluttered measurement sets a sensor would report for them. Used by the
//! integration tests, the demo and the benchmarks; the filter itself never
//! depends on this module.

use crate::Real;
use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

/// Scenario parameters for measurement synthesis.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Measurement (position) dimension
    pub measure_dim: usize,
    /// Number of simulated time steps
    pub num_steps: usize,
    /// Time between steps
    pub sampling_period: Real,
    /// Probability that an alive target produces a measurement
    pub detection_probability: Real,
    /// Standard deviation of the position/speed measurement noise
    pub measurement_noise: Real,
    /// Expected number of clutter points per step (Poisson rate)
    pub clutter_rate: Real,
    /// Lower bound of the surveillance region, per axis
    pub surveillance_min: Real,
    /// Upper bound of the surveillance region, per axis
    pub surveillance_max: Real,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            measure_dim: 3,
            num_steps: 50,
            sampling_period: 1.0,
            detection_probability: 0.9,
            measurement_noise: 1.0,
            clutter_rate: 2.0,
            surveillance_min: -100.0,
            surveillance_max: 100.0,
        }
    }
}

/// Ground truth for a single constant-velocity target.
#[derive(Debug, Clone)]
pub struct TargetTruth {
    /// Step at which the target appears
    pub birth_time: usize,
    /// Step at which the target disappears (exclusive)
    pub death_time: usize,
    /// Position at birth
    pub position: DVector<Real>,
    /// Constant velocity
    pub velocity: DVector<Real>,
}

impl TargetTruth {
    /// Create a new target truth from flat position/velocity values.
    pub fn new(birth_time: usize, death_time: usize, position: Vec<Real>, velocity: Vec<Real>) -> Self {
        Self {
            birth_time,
            death_time,
            position: DVector::from_vec(position),
            velocity: DVector::from_vec(velocity),
        }
    }

    /// True position at a given step, or None if the target is not alive.
    pub fn position_at(&self, step: usize, sampling_period: Real) -> Option<DVector<Real>> {
        if step < self.birth_time || step >= self.death_time {
            return None;
        }
        let elapsed = (step - self.birth_time) as Real * sampling_period;
        Some(&self.position + &self.velocity * elapsed)
    }
}

/// Flat measurement arrays for one step, in the layout the filter ingests.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSet {
    /// Measured positions, `measure_dim` values per detection
    pub positions: Vec<Real>,
    /// Measured speeds, `measure_dim` values per detection
    pub speeds: Vec<Real>,
}

impl MeasurementSet {
    /// Number of detections in this set.
    pub fn len(&self, measure_dim: usize) -> usize {
        self.positions.len() / measure_dim
    }
}

/// Generate per-step measurement sets for a scenario.
///
/// Alive targets are detected with `detection_probability`; detections carry
/// Gaussian position and speed noise. Clutter detections are drawn from a
/// Poisson-distributed count, uniformly over the surveillance region, with
/// zero reported speed.
///
/// # Arguments
/// * `rng` - Random source (use [`super::rng::SimpleRng`] for reproducibility)
/// * `config` - Scenario parameters
/// * `targets` - Ground-truth trajectories
///
/// # Returns
/// One [`MeasurementSet`] per simulated step
pub fn generate_measurements<R: Rng + ?Sized>(
    rng: &mut R,
    config: &ScenarioConfig,
    targets: &[TargetTruth],
) -> Vec<MeasurementSet> {
    let noise = Normal::new(0.0, config.measurement_noise).unwrap();
    let span = config.surveillance_max - config.surveillance_min;

    let mut steps = Vec::with_capacity(config.num_steps);

    for t in 0..config.num_steps {
        let mut set = MeasurementSet::default();

        // Target-originated detections
        for truth in targets {
            let position = match truth.position_at(t, config.sampling_period) {
                Some(p) => p,
                None => continue,
            };
            if rng.gen::<Real>() >= config.detection_probability {
                continue;
            }
            for i in 0..config.measure_dim {
                set.positions.push(position[i] + noise.sample(rng));
                set.speeds.push(truth.velocity[i] + noise.sample(rng));
            }
        }

        // Clutter detections, uniform over the surveillance region
        if config.clutter_rate > 0.0 {
            let count = Poisson::new(config.clutter_rate).unwrap().sample(rng) as usize;
            for _ in 0..count {
                for _ in 0..config.measure_dim {
                    set.positions
                        .push(config.surveillance_min + rng.gen::<Real>() * span);
                    set.speeds.push(0.0);
                }
            }
        }

        steps.push(set);
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng::SimpleRng;

    fn ideal_config() -> ScenarioConfig {
        ScenarioConfig {
            num_steps: 10,
            detection_probability: 1.0,
            measurement_noise: 0.0,
            clutter_rate: 0.0,
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn test_ideal_sensor_reports_every_alive_target() {
        let mut rng = SimpleRng::new(42);
        let config = ideal_config();
        let targets = vec![
            TargetTruth::new(0, 10, vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]),
            TargetTruth::new(5, 10, vec![10.0, 10.0, 10.0], vec![0.0, 0.0, 0.0]),
        ];

        let steps = generate_measurements(&mut rng, &config, &targets);

        assert_eq!(steps.len(), 10);
        assert_eq!(steps[0].len(config.measure_dim), 1);
        assert_eq!(steps[7].len(config.measure_dim), 2);
    }

    #[test]
    fn test_noiseless_measurements_match_truth() {
        let mut rng = SimpleRng::new(42);
        let config = ideal_config();
        let targets = vec![TargetTruth::new(0, 10, vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0])];

        let steps = generate_measurements(&mut rng, &config, &targets);

        // Position advances by one unit of velocity per step
        assert!((steps[3].positions[0] - 3.0).abs() < 1e-5);
        assert!((steps[3].speeds[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dead_targets_are_silent() {
        let mut rng = SimpleRng::new(42);
        let config = ideal_config();
        let targets = vec![TargetTruth::new(0, 3, vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0])];

        let steps = generate_measurements(&mut rng, &config, &targets);

        assert_eq!(steps[2].len(config.measure_dim), 1);
        assert_eq!(steps[3].len(config.measure_dim), 0);
    }

    #[test]
    fn test_clutter_only_scenario() {
        let mut rng = SimpleRng::new(42);
        let config = ScenarioConfig {
            num_steps: 30,
            clutter_rate: 5.0,
            ..ScenarioConfig::default()
        };

        let steps = generate_measurements(&mut rng, &config, &[]);

        let total: usize = steps.iter().map(|s| s.len(config.measure_dim)).sum();
        // Poisson(5) over 30 steps; a wide band keeps this robust to the seed
        assert!(total > 50 && total < 300, "unexpected clutter volume {total}");
        for set in &steps {
            assert!(set.speeds.iter().all(|&v| v == 0.0));
        }
    }
}
