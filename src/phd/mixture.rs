//! Gaussian mixture
//!
//! An ordered collection of weighted Gaussian components. Order carries no
//! probabilistic meaning but is preserved deterministically: the update
//! stage cross-references components by index, and pruning must behave the
//! same on every run for a given input.

use crate::common::linalg;
use crate::phd::types::GaussianComponent;
use crate::Real;
use nalgebra::{DMatrix, Matrix4};
use smallvec::SmallVec;

/// Ordered Gaussian mixture over a fixed state space.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaussianMixture {
    /// Components, in insertion order
    pub components: Vec<GaussianComponent>,
    x_dim: usize,
    measure_dim: usize,
}

impl GaussianMixture {
    /// Create an empty mixture over a `x_dim`-dimensional state with a
    /// `measure_dim`-dimensional position block.
    pub fn new(x_dim: usize, measure_dim: usize) -> Self {
        Self {
            components: Vec::new(),
            x_dim,
            measure_dim,
        }
    }

    /// Create a mixture from existing components
    pub fn from_components(
        x_dim: usize,
        measure_dim: usize,
        components: Vec<GaussianComponent>,
    ) -> Self {
        Self {
            components,
            x_dim,
            measure_dim,
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

    /// Number of components
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the mixture has no components
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Remove all components
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Append a component
    pub fn push(&mut self, component: GaussianComponent) {
        self.components.push(component);
    }

    /// Iterate over the components
    pub fn iter(&self) -> std::slice::Iter<'_, GaussianComponent> {
        self.components.iter()
    }

    /// Sum of all component weights (the expected target count)
    pub fn total_weight(&self) -> Real {
        self.components.iter().map(|g| g.weight).sum()
    }

    /// Sort components by descending weight.
    ///
    /// The sort is stable, so ties keep their input order and the result is
    /// deterministic for a given mixture.
    pub fn sort_by_weight_descending(&mut self) {
        self.components.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Divide every weight by `linear_offset + sum(weights)`.
    ///
    /// If that divisor is exactly zero the weights are left unchanged.
    pub fn normalize(&mut self, linear_offset: Real) {
        let sum: Real = self.components.iter().map(|g| g.weight).sum();

        if linear_offset + sum == 0.0 {
            return;
        }
        for gaussian in &mut self.components {
            gaussian.weight /= linear_offset + sum;
        }
    }

    /// Strided variant of [`normalize`](Self::normalize), applied to the
    /// components at indices `start * step, (start+1) * step, ...,
    /// (stop-1) * step`.
    ///
    /// The update stage uses this to normalize one measurement's hypothesis
    /// slice with the clutter intensity as `linear_offset`.
    pub fn normalize_range(&mut self, linear_offset: Real, start: usize, stop: usize, step: usize) {
        let mut sum: Real = 0.0;
        for i in start..stop {
            sum += self.components[i * step].weight;
        }

        if linear_offset + sum == 0.0 {
            return;
        }
        for i in start..stop {
            self.components[i * step].weight /= linear_offset + sum;
        }
    }

    /// Apply a rigid reference-frame change to every component.
    ///
    /// Positions (leading 3 mean entries) are rotated and translated by the
    /// 4x4 affine `transform`; velocities (next 3 entries, when present) are
    /// rotated only. The covariance is conjugated by the block-diagonal
    /// rotation so position and velocity uncertainty follow the new frame.
    pub fn change_referential(&mut self, transform: &Matrix4<Real>) {
        if self.x_dim < 3 {
            return;
        }

        let rotation = transform.fixed_view::<3, 3>(0, 0).into_owned();
        let translation = transform.fixed_view::<3, 1>(0, 3).into_owned();
        let has_velocity = self.x_dim >= 6;

        let mut full_rotation = DMatrix::identity(self.x_dim, self.x_dim);
        full_rotation.view_mut((0, 0), (3, 3)).copy_from(&rotation);
        if has_velocity {
            full_rotation.view_mut((3, 3), (3, 3)).copy_from(&rotation);
        }

        for gaussian in &mut self.components {
            let position = gaussian.mean.fixed_rows::<3>(0).into_owned();
            gaussian
                .mean
                .fixed_rows_mut::<3>(0)
                .copy_from(&(rotation * position + translation));

            if has_velocity {
                let velocity = gaussian.mean.fixed_rows::<3>(3).into_owned();
                gaussian
                    .mean
                    .fixed_rows_mut::<3>(3)
                    .copy_from(&(rotation * velocity));
            }

            gaussian.covariance =
                &full_rotation * &gaussian.covariance * full_rotation.transpose();
        }
    }

    /// Moment-matched merge of the components at `indices`.
    ///
    /// The merged weight is the sum of the input weights, the mean their
    /// weighted average, and the covariance the weighted average of the
    /// input covariances plus the spread of their means. If the summed
    /// weight is zero, mean and covariance stay zero. A single index
    /// returns that component unchanged.
    ///
    /// The inputs are left in place; [`prune`](Self::prune) removes them
    /// separately. `indices` must not be empty.
    pub fn merge(&self, indices: &[usize]) -> GaussianComponent {
        debug_assert!(!indices.is_empty(), "merge requires at least one index");

        if indices.len() == 1 {
            return self.components[indices[0]].clone();
        }

        let mut merged = GaussianComponent::zero(self.x_dim);

        for &i in indices {
            merged.weight += self.components[i].weight;
        }

        for &i in indices {
            merged.mean += &self.components[i].mean * self.components[i].weight;
        }
        if merged.weight != 0.0 {
            merged.mean /= merged.weight;
        }

        for &i in indices {
            let diff = &merged.mean - &self.components[i].mean;
            merged.covariance +=
                (&self.components[i].covariance + &diff * diff.transpose())
                    * self.components[i].weight;
        }
        if merged.weight != 0.0 {
            merged.covariance /= merged.weight;
        }

        merged
    }

    /// Index of the strictly heaviest component.
    ///
    /// Returns `None` when the mixture is empty or no component has a
    /// positive weight.
    pub fn select_best_gaussian(&self) -> Option<usize> {
        let mut best_weight: Real = 0.0;
        let mut best = None;

        for (i, gaussian) in self.components.iter().enumerate() {
            if gaussian.weight > best_weight {
                best_weight = gaussian.weight;
                best = Some(i);
            }
        }

        best
    }

    /// Indices of every non-zero-weight component whose squared Mahalanobis
    /// position distance to component `i_ref` is below `threshold`.
    ///
    /// The distance uses the reference component's position covariance
    /// block; `i_ref` itself is never included.
    pub fn select_close_gaussians(&self, i_ref: usize, threshold: Real) -> SmallVec<[usize; 8]> {
        let reference = &self.components[i_ref];
        let d = self.measure_dim.min(self.x_dim);

        let mut close = SmallVec::new();
        for (i, gaussian) in self.components.iter().enumerate() {
            if i == i_ref {
                continue;
            }

            let distance = linalg::mahalanobis_squared(
                &gaussian.mean,
                &reference.mean,
                &reference.covariance,
                d,
            );

            if distance < threshold && gaussian.weight != 0.0 {
                close.push(i);
            }
        }

        close
    }

    /// Greedy cluster-and-merge reduction.
    ///
    /// Repeatedly takes the heaviest remaining component, merges every
    /// component within `merge_threshold` (squared Mahalanobis position
    /// distance) into it and moves the result to the output, until the
    /// input is exhausted, the heaviest weight drops below
    /// `truncate_threshold`, or the output reaches `max_components`.
    ///
    /// On exit every kept component has weight >= `truncate_threshold` and
    /// the mixture holds at most `max_components` components.
    pub fn prune(&mut self, truncate_threshold: Real, merge_threshold: Real, max_components: usize) {
        let mut pruned: Vec<GaussianComponent> = Vec::new();

        while !self.components.is_empty() && pruned.len() < max_components {
            let best = match self.select_best_gaussian() {
                Some(i) => i,
                None => break,
            };
            if self.components[best].weight < truncate_threshold {
                break;
            }

            let mut cluster = self.select_close_gaussians(best, merge_threshold);
            cluster.push(best);

            pruned.push(self.merge(&cluster));

            // Erase merged inputs from the back so earlier indices stay valid
            cluster.sort_unstable();
            for &index in cluster.iter().rev() {
                self.components.remove(index);
            }
        }

        self.components = pruned;
    }
}
