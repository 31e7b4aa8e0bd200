// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Sample Arena
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py
// ─────────────────────────────────────────────────────────────────────
//! Parallel sample arrays of a two-parameter sweep.
//!
//! Clusters and candidate sets refer to samples by index into a
//! [`SampleSet`]; they never copy sample data.

use crate::error::{OptimaError, OptimaResult};

/// Period of the x axis (deg). `x_norm = x / X_PERIOD_DEG`.
pub const X_PERIOD_DEG: f64 = 360.0;

/// Period of the y axis (rad). `y_norm = y / Y_PERIOD_RAD`.
pub const Y_PERIOD_RAD: f64 = std::f64::consts::TAU;

/// Immutable sweep samples plus their normalised coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: Vec<f64>,
    y: Vec<f64>,
    phase: Vec<f64>,
    leakage: Vec<f64>,
    x_norm: Vec<f64>,
    y_norm: Vec<f64>,
}

impl SampleSet {
    /// Build a sample set from parallel arrays.
    ///
    /// Fails if the arrays are empty, differ in length, contain a
    /// non-finite coordinate, or hold a leakage that is not a finite
    /// non-negative number. A NaN phase is kept; it never passes the
    /// phase threshold.
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        phase: Vec<f64>,
        leakage: Vec<f64>,
    ) -> OptimaResult<Self> {
        let n = x.len();
        if n == 0 {
            return Err(OptimaError::Validation(
                "sample arrays must not be empty".to_string(),
            ));
        }
        if y.len() != n || phase.len() != n || leakage.len() != n {
            return Err(OptimaError::Validation(format!(
                "sample arrays differ in length: x={}, y={}, phase={}, leakage={}",
                n,
                y.len(),
                phase.len(),
                leakage.len()
            )));
        }
        if let Some(i) = (0..n).find(|&i| !x[i].is_finite() || !y[i].is_finite()) {
            return Err(OptimaError::Validation(format!(
                "sample {i} has a non-finite coordinate ({}, {})",
                x[i], y[i]
            )));
        }

        if let Some(i) = (0..n).find(|&i| !(leakage[i].is_finite() && leakage[i] >= 0.0)) {
            return Err(OptimaError::Validation(format!(
                "sample {i} has invalid leakage {}",
                leakage[i]
            )));
        }

        let x_norm = x.iter().map(|v| v / X_PERIOD_DEG).collect();
        let y_norm = y.iter().map(|v| v / Y_PERIOD_RAD).collect();
        Ok(Self {
            x,
            y,
            phase,
            leakage,
            x_norm,
            y_norm,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    pub fn leakage(&self) -> &[f64] {
        &self.leakage
    }

    pub fn x_norm(&self) -> &[f64] {
        &self.x_norm
    }

    pub fn y_norm(&self) -> &[f64] {
        &self.y_norm
    }

    /// Normalised coordinate of sample `i`.
    #[inline]
    pub fn norm_point(&self, i: usize) -> (f64, f64) {
        (self.x_norm[i], self.y_norm[i])
    }

    /// Squared Euclidean distance between samples `a` and `b` in
    /// normalised coordinates.
    #[inline]
    pub fn norm_dist_sq(&self, a: usize, b: usize) -> f64 {
        let dx = self.x_norm[a] - self.x_norm[b];
        let dy = self.y_norm[a] - self.y_norm[b];
        dx * dx + dy * dy
    }

    /// True if sample `i` lies on the edge of the sweep: its x or y equals
    /// the global minimum or maximum of that axis.
    ///
    /// An axis on which every sample has the same value was not swept and
    /// contributes no edge.
    pub fn is_boundary(&self, i: usize, bounds: &SweepBounds) -> bool {
        let on_x = bounds.x_swept() && (self.x[i] == bounds.x_min || self.x[i] == bounds.x_max);
        let on_y = bounds.y_swept() && (self.y[i] == bounds.y_min || self.y[i] == bounds.y_max);
        on_x || on_y
    }

    /// Extent of the sweep over the full sample set.
    pub fn bounds(&self) -> SweepBounds {
        let (x_min, x_max) = min_max(&self.x);
        let (y_min, y_max) = min_max(&self.y);
        SweepBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

/// Min/max of each axis over all samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl SweepBounds {
    pub fn x_swept(&self) -> bool {
        self.x_max > self.x_min
    }

    pub fn y_swept(&self) -> bool {
        self.y_max > self.y_min
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
