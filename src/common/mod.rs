//! Low-level utilities shared by the filter and its test tooling.

pub mod ground_truth;
pub mod linalg;
pub mod rng;
