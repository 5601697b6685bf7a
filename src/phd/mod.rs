//! Gaussian Mixture PHD filter
//!
//! The filter approximates the first-order moment of the multi-target
//! posterior (the PHD intensity) with a weighted Gaussian mixture. Each
//! [`GmPhdFilter::propagate`] call runs one full recursion:
//!
//! 1. prediction - surviving targets through the dynamics, plus birth and
//!    spawn injection ([`prediction`])
//! 2. update - `(M+1)*T` hypothesis expansion against the measurement set,
//!    with clutter-aware per-measurement normalization ([`update`])
//! 3. reduction - greedy prune/merge back to a bounded mixture
//!    ([`GaussianMixture::prune`])
//!
//! Targets are read out with [`GmPhdFilter::get_tracked_targets`], which
//! keeps every component whose weight clears a threshold.

pub mod config;
pub mod errors;
pub mod filter;
pub mod mixture;
pub mod output;
pub mod prediction;
pub mod types;
pub mod update;

pub use config::{DynamicsModel, ObservationModel, PruningConfig, SpawnModel};
pub use errors::FilterError;
pub use filter::GmPhdFilter;
pub use mixture::GaussianMixture;
pub use output::TrackedTargets;
pub use prediction::UpdateComponents;
pub use types::GaussianComponent;
