// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Heatmap Interpolator Interface
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (interp_to_1D_arr)
// ─────────────────────────────────────────────────────────────────────
//! Interface to the heatmap interpolator and the grid reshape that turns
//! its output back into parallel sample arrays.
//!
//! Interpolation itself lives outside the kernel (the analysis layer uses
//! scipy or similar). The search does not care whether its samples are
//! raw or interpolated; `RegularGrid::flatten` is how interpolated data
//! reaches it.

use optima_types::{OptimaError, OptimaResult};

/// A metric sampled on a regular `x` × `y` grid.
///
/// `z` is row-major with one row per `y` value: `z[j * x.len() + i]` is
/// the value at `(x[i], y[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl RegularGrid {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> OptimaResult<Self> {
        if z.len() != x.len() * y.len() {
            return Err(OptimaError::Validation(format!(
                "grid values have length {}, expected {} x {} = {}",
                z.len(),
                x.len(),
                y.len(),
                x.len() * y.len()
            )));
        }
        Ok(Self { x, y, z })
    }

    /// Build from one row of values per `y`, each `x.len()` long.
    pub fn from_rows(x: Vec<f64>, y: Vec<f64>, rows: Vec<Vec<f64>>) -> OptimaResult<Self> {
        if rows.len() != y.len() {
            return Err(OptimaError::Validation(format!(
                "grid has {} rows, expected {}",
                rows.len(),
                y.len()
            )));
        }
        if let Some((j, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != x.len()) {
            return Err(OptimaError::Validation(format!(
                "grid row {j} has length {}, expected {}",
                row.len(),
                x.len()
            )));
        }
        let z = rows.into_iter().flatten().collect();
        Ok(Self { x, y, z })
    }

    /// Parallel 1-D `(x, y, z)` arrays, one entry per grid node, in the
    /// same row-major order as `z`.
    pub fn flatten(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.z.len();
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for &yv in &self.y {
            for &xv in &self.x {
                xs.push(xv);
                ys.push(yv);
            }
        }
        (xs, ys, self.z.clone())
    }

    /// Keep every `ceil(len / max_len)`-th node along each axis so that
    /// neither axis exceeds `max_len` nodes.
    pub fn decimate(&self, max_len: usize) -> OptimaResult<Self> {
        if max_len == 0 {
            return Err(OptimaError::Validation(
                "decimation length must be > 0".to_string(),
            ));
        }
        let step_x = self.x.len().div_ceil(max_len).max(1);
        let step_y = self.y.len().div_ceil(max_len).max(1);

        let x: Vec<f64> = self.x.iter().copied().step_by(step_x).collect();
        let y: Vec<f64> = self.y.iter().copied().step_by(step_y).collect();
        let nx = self.x.len();
        let z = (0..self.y.len())
            .step_by(step_y)
            .flat_map(|j| (0..nx).step_by(step_x).map(move |i| j * nx + i))
            .map(|k| self.z[k])
            .collect();
        Ok(Self { x, y, z })
    }
}

/// Interpolates scattered `(x, y, z)` samples onto a regular grid.
pub trait HeatmapInterpolator: Send + Sync {
    fn interpolate(&self, x: &[f64], y: &[f64], z: &[f64]) -> OptimaResult<RegularGrid>;
}

type InterpolateFn = Box<dyn Fn(&[f64], &[f64], &[f64]) -> Result<RegularGrid, String> + Send + Sync>;

/// Interpolator backed by a caller-supplied function.
///
/// Used by the FFI layer to delegate interpolation to Python.
pub struct ExternalInterpolator {
    interpolate_fn: InterpolateFn,
}

impl ExternalInterpolator {
    pub fn new(
        interpolate_fn: impl Fn(&[f64], &[f64], &[f64]) -> Result<RegularGrid, String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            interpolate_fn: Box::new(interpolate_fn),
        }
    }
}

impl HeatmapInterpolator for ExternalInterpolator {
    fn interpolate(&self, x: &[f64], y: &[f64], z: &[f64]) -> OptimaResult<RegularGrid> {
        (self.interpolate_fn)(x, y, z).map_err(OptimaError::Collaborator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x2() -> RegularGrid {
        RegularGrid::new(
            vec![0.0, 1.0, 2.0],
            vec![10.0, 20.0],
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(RegularGrid::new(vec![0.0, 1.0], vec![0.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]];
        let g = RegularGrid::from_rows(vec![0.0, 1.0, 2.0], vec![10.0, 20.0], rows).unwrap();
        assert_eq!(g, grid_3x2());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        // 2 + 4 values match 3 x 2 in total but not per row
        let rows = vec![vec![0.0, 1.0], vec![2.0, 3.0, 4.0, 5.0]];
        let err = RegularGrid::from_rows(vec![0.0, 1.0, 2.0], vec![10.0, 20.0], rows).unwrap_err();
        assert!(matches!(err, OptimaError::Validation(_)));
    }

    #[test]
    fn test_flatten_row_major() {
        let (x, y, z) = grid_3x2().flatten();
        assert_eq!(x, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(y, vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
        assert_eq!(z, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_decimate() {
        let g = grid_3x2().decimate(2).unwrap();
        // step_x = ceil(3/2) = 2, step_y = ceil(2/2) = 1
        assert_eq!(g.x, vec![0.0, 2.0]);
        assert_eq!(g.y, vec![10.0, 20.0]);
        assert_eq!(g.z, vec![0.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_decimate_noop_when_small() {
        assert_eq!(grid_3x2().decimate(10).unwrap(), grid_3x2());
    }

    #[test]
    fn test_decimate_zero_rejected() {
        assert!(grid_3x2().decimate(0).is_err());
    }

    #[test]
    fn test_external_interpolator() {
        let interp = ExternalInterpolator::new(|x, y, z| {
            RegularGrid::new(x.to_vec(), y.to_vec(), z.to_vec()).map_err(|e| e.to_string())
        });
        let grid = interp.interpolate(&[0.0], &[0.0], &[0.5]).unwrap();
        assert_eq!(grid.z, vec![0.5]);

        let failing = ExternalInterpolator::new(|_, _, _| Err("qhull failed".to_string()));
        assert_eq!(
            failing.interpolate(&[], &[], &[]).unwrap_err(),
            OptimaError::Collaborator("qhull failed".to_string())
        );
    }
}
