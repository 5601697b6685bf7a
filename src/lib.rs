/*!
# gmphd - Gaussian Mixture PHD multi-target tracker

Rust implementation of the Gaussian Mixture Probability Hypothesis Density
(GM-PHD) filter for tracking a varying, unknown number of targets from noisy
position/velocity measurements.

## Features

- Linear-Gaussian GM-PHD recursion: prediction (survival + birth + spawn),
  measurement update with clutter-aware normalization, prune/merge reduction
- Runtime state dimensions, position-only or position+velocity motion model
- Target extraction by weight threshold
- Reference-frame changes applied directly to the tracked mixture

## Modules

- [`phd`] - The GM-PHD filter: mixture type, recursion stages, façade
- [`common`] - Low-level utilities (linear algebra, RNG, scenario synthesis)

## Example

```rust,no_run
use gmphd::{GaussianComponent, GmPhdFilter};
use nalgebra::{DMatrix, DVector};

// 3-D measurements with a constant-velocity motion model (6-D state)
let mut filter = GmPhdFilter::new(64, 3, true, false);

filter.set_birth_model(vec![GaussianComponent::new(
    0.2,
    DVector::zeros(6),
    DMatrix::identity(6, 6),
)]).unwrap();
filter.set_dynamics_model(1.0, 0.1);
filter.set_observation_model(0.9, 1.0, 1.0, 0.0);
filter.set_pruning_parameters(0.1, 4.0, 50);
filter.set_survival_probability(0.99);

// One measurement near the origin
filter.set_new_measurements(&[0.1, -0.2, 0.0], &[0.0, 0.0, 0.0]).unwrap();
filter.propagate().unwrap();

let tracked = filter.get_tracked_targets(0.5);
println!("tracking {} targets", tracked.len());
```
*/

/// Scalar type used throughout the crate.
///
/// Single precision by default; enable the `f64` cargo feature for a
/// double-precision build.
#[cfg(not(feature = "f64"))]
pub type Real = f32;

/// Scalar type used throughout the crate (double-precision build).
#[cfg(feature = "f64")]
pub type Real = f64;

/// Low-level utilities (linear algebra, deterministic RNG, scenario synthesis)
pub mod common;

/// GM-PHD filter: mixture representation and the predict/update/prune recursion
pub mod phd;

// Re-exports for convenience
pub use phd::{
    DynamicsModel, FilterError, GaussianComponent, GaussianMixture, GmPhdFilter,
    ObservationModel, PruningConfig, SpawnModel, TrackedTargets,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
