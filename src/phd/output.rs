//! Extraction output
//!
//! Flat, parallel position/speed/weight sequences for the targets whose
//! weight cleared the extraction threshold. The layout matches the
//! measurement input format: `measure_dim` values per target.

use crate::Real;

/// Extracted target states as parallel flat sequences.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedTargets {
    /// Positions, `measure_dim` values per target
    pub positions: Vec<Real>,
    /// Speeds, `measure_dim` values per target (zero without a motion model)
    pub speeds: Vec<Real>,
    /// One weight per target
    pub weights: Vec<Real>,
    measure_dim: usize,
}

impl TrackedTargets {
    /// Create an empty output for the given measurement dimension
    pub fn new(measure_dim: usize) -> Self {
        Self {
            positions: Vec::new(),
            speeds: Vec::new(),
            weights: Vec::new(),
            measure_dim,
        }
    }

    /// Number of extracted targets
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if no target was extracted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Measurement (position) dimension
    #[inline]
    pub fn measure_dim(&self) -> usize {
        self.measure_dim
    }

    /// Position of target `i`
    pub fn position(&self, i: usize) -> &[Real] {
        &self.positions[i * self.measure_dim..(i + 1) * self.measure_dim]
    }

    /// Speed of target `i`
    pub fn speed(&self, i: usize) -> &[Real] {
        &self.speeds[i * self.measure_dim..(i + 1) * self.measure_dim]
    }
}
