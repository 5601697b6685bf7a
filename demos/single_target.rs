//! Minimal GM-PHD walkthrough: one moving target, noisy detections, a bit
//! of clutter, printed extraction per step.
//!
//! Run with: cargo run --example single_target

use gmphd::common::ground_truth::{generate_measurements, ScenarioConfig, TargetTruth};
use gmphd::common::rng::SimpleRng;
use gmphd::{GaussianComponent, GmPhdFilter};
use nalgebra::{DMatrix, DVector};

fn main() {
    let scenario = ScenarioConfig {
        measure_dim: 3,
        num_steps: 30,
        sampling_period: 1.0,
        detection_probability: 0.9,
        measurement_noise: 0.5,
        clutter_rate: 1.0,
        surveillance_min: -50.0,
        surveillance_max: 50.0,
    };
    let truth = TargetTruth::new(0, 30, vec![-10.0, 0.0, 0.0], vec![1.0, 0.5, 0.0]);

    let mut rng = SimpleRng::new(7);
    let steps = generate_measurements(&mut rng, &scenario, &[truth.clone()]);

    let mut filter = GmPhdFilter::new(50, 3, true, false);
    filter
        .set_birth_model(vec![GaussianComponent::new(
            0.2,
            DVector::from_vec(vec![-10.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            DMatrix::identity(6, 6) * 2.0,
        )])
        .unwrap();
    filter.set_dynamics_model(scenario.sampling_period, 0.2);
    filter.set_observation_model(scenario.detection_probability, 0.5, 0.5, 1e-6);
    filter.set_pruning_parameters(0.01, 4.0, 50);
    filter.set_survival_probability(0.99);

    for (t, set) in steps.iter().enumerate() {
        filter
            .set_new_measurements(&set.positions, &set.speeds)
            .unwrap();
        filter.propagate().expect("propagation failed");

        let tracked = filter.get_tracked_targets(0.4);
        let truth_pos = truth
            .position_at(t, scenario.sampling_period)
            .expect("target is alive for the whole run");

        print!(
            "step {:2}: {} detections, {} tracked | truth ({:6.2} {:6.2} {:6.2})",
            t,
            set.len(scenario.measure_dim),
            tracked.len(),
            truth_pos[0],
            truth_pos[1],
            truth_pos[2],
        );
        if tracked.is_empty() {
            println!(" | no extraction");
        } else {
            let p = tracked.position(0);
            println!(
                " | estimate ({:6.2} {:6.2} {:6.2}) weight {:.2}",
                p[0], p[1], p[2], tracked.weights[0]
            );
        }
    }
}
