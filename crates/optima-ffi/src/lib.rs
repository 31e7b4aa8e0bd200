// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the optimal-point search.
//!
//! Exposes `OptimizerConfig`, `RankedResult`, `RustOptimalPointFinder`,
//! and the module-level `find_optimal_points` used by the flux-landscape
//! analysis.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - Python exceptions inside callbacks surface as `ValueError`.
//! - All config validated before storage (`OptimizerConfig::validate()`).
//!
//! Install: `pip install -e crates/optima-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from optima_kernel import find_optimal_points
//!
//! idxs, clusters = find_optimal_points(theta_f, lambda_2, cond_phase, L1,
//!                                      target_value=180)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use optima_core::{ExternalWaveform, OptimalPointFinder, RegularGrid};
use optima_types::{OptimaError, OptimizerConfig, RankedResult, SampleSet};

fn to_py_err(e: OptimaError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn sample_set(x: Vec<f64>, y: Vec<f64>, phase: Vec<f64>, leakage: Vec<f64>) -> PyResult<SampleSet> {
    SampleSet::new(x, y, phase, leakage).map_err(to_py_err)
}

// ─── PyOptimizerConfig ──────────────────────────────────────────────

/// Python-visible search configuration.
#[pyclass(name = "OptimizerConfig")]
#[derive(Clone)]
struct PyOptimizerConfig {
    inner: OptimizerConfig,
}

#[pymethods]
impl PyOptimizerConfig {
    #[new]
    #[pyo3(signature = (
        phase_threshold = 5.0,
        leakage_threshold = 0.3,
        clustering_radius_deg = 10.0,
        tolerances = vec![1.0, 2.0, 3.0],
        neighborhood_factor = 1.5,
        secondary_target_factor = 2.0,
    ))]
    fn new(
        phase_threshold: f64,
        leakage_threshold: f64,
        clustering_radius_deg: f64,
        tolerances: Vec<f64>,
        neighborhood_factor: f64,
        secondary_target_factor: f64,
    ) -> PyResult<Self> {
        let config = OptimizerConfig {
            phase_threshold,
            leakage_threshold,
            clustering_radius_deg,
            neighborhood_factor,
            tolerances,
            secondary_target_factor,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = OptimizerConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn tolerances(&self) -> Vec<f64> {
        self.inner.tolerances.clone()
    }

    #[getter]
    fn clustering_radius_deg(&self) -> f64 {
        self.inner.clustering_radius_deg
    }

    fn __repr__(&self) -> String {
        format!(
            "OptimizerConfig(phase_threshold={}, leakage_threshold={}, clustering_radius_deg={}, tolerances={:?})",
            self.inner.phase_threshold,
            self.inner.leakage_threshold,
            self.inner.clustering_radius_deg,
            self.inner.tolerances
        )
    }
}

// ─── PyRankedResult ─────────────────────────────────────────────────

/// Python-visible ranked optimal points.
#[pyclass(name = "RankedResult")]
#[derive(Clone)]
struct PyRankedResult {
    inner: RankedResult,
}

#[pymethods]
impl PyRankedResult {
    #[getter]
    fn optimal_idxs(&self) -> Vec<usize> {
        self.inner.representatives.clone()
    }

    #[getter]
    fn clusters_by_indx(&self) -> Vec<Vec<usize>> {
        self.inner.clusters.clone()
    }

    #[getter]
    fn tolerance_used(&self) -> Option<f64> {
        self.inner.tolerance_used
    }

    #[getter]
    fn escalations(&self) -> usize {
        self.inner.escalations
    }

    /// Reorder by waveform spike penalty. Returns the sorted penalties.
    fn rescore_by_spikes(&mut self, waveforms: Vec<Vec<f64>>) -> PyResult<Vec<f64>> {
        optima_core::rescore_by_spikes(&mut self.inner, &waveforms).map_err(to_py_err)
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("optimal_idxs", self.inner.representatives.clone())?;
        dict.set_item("clusters_by_indx", self.inner.clusters.clone())?;
        dict.set_item("tolerance_used", self.inner.tolerance_used)?;
        dict.set_item("escalations", self.inner.escalations)?;
        Ok(dict)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "RankedResult(optimal_idxs={:?}, n_clusters={}, tolerance_used={:?})",
            self.inner.representatives,
            self.inner.clusters.len(),
            self.inner.tolerance_used
        )
    }
}

// ─── RustOptimalPointFinder ─────────────────────────────────────────

/// Reusable search with a fixed configuration.
#[pyclass(name = "RustOptimalPointFinder")]
struct PyOptimalPointFinder {
    inner: OptimalPointFinder,
}

#[pymethods]
impl PyOptimalPointFinder {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyOptimizerConfig>) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        Ok(Self {
            inner: OptimalPointFinder::new(cfg).map_err(to_py_err)?,
        })
    }

    /// Ranked optimal points of a sweep.
    ///
    /// Args:
    ///     x, y: Sweep coordinates (deg, rad).
    ///     phase: Conditional phase per sample (deg).
    ///     leakage: Leakage per sample.
    ///     target_phase: Target conditional phase (deg).
    #[pyo3(signature = (x, y, phase, leakage, target_phase = 180.0))]
    fn find(
        &self,
        py: Python<'_>,
        x: Vec<f64>,
        y: Vec<f64>,
        phase: Vec<f64>,
        leakage: Vec<f64>,
        target_phase: f64,
    ) -> PyResult<PyRankedResult> {
        let samples = sample_set(x, y, phase, leakage)?;
        let result = py
            .allow_threads(|| self.inner.find(&samples, target_phase))
            .map_err(to_py_err)?;
        Ok(PyRankedResult { inner: result })
    }

    /// Waveforms for each ranked point, via a Python generator.
    ///
    /// Args:
    ///     x, y: Sweep coordinates the result refers to.
    ///     result: RankedResult from `find`.
    ///     generator: Callable[[float, float], list[float]].
    fn generate_waveforms(
        &self,
        x: Vec<f64>,
        y: Vec<f64>,
        result: &PyRankedResult,
        generator: PyObject,
    ) -> PyResult<Vec<Vec<f64>>> {
        let n = x.len();
        let samples = sample_set(x, y, vec![0.0; n], vec![0.0; n])?;
        let external = ExternalWaveform::new(move |xv: f64, yv: f64| {
            Python::with_gil(|py| {
                generator
                    .call1(py, (xv, yv))
                    .and_then(|w| w.extract::<Vec<f64>>(py))
                    .map_err(|e| e.to_string())
            })
        });
        optima_core::generate_for_result(&external, &samples, &result.inner).map_err(to_py_err)
    }

    #[getter]
    fn config(&self) -> PyOptimizerConfig {
        PyOptimizerConfig {
            inner: self.inner.config().clone(),
        }
    }
}

// ─── Module functions ───────────────────────────────────────────────

/// Ranked optimal points of a sweep.
///
/// Returns: tuple(optimal_idxs: list[int], clusters_by_indx: list[list[int]])
#[pyfunction]
#[pyo3(signature = (
    x,
    y,
    deviation_metric,
    leakage_metric,
    target_value = 180.0,
    phase_threshold = 5.0,
    leakage_threshold = 0.3,
    clustering_radius_deg = 10.0,
    tolerances = vec![1.0, 2.0, 3.0],
))]
#[allow(clippy::too_many_arguments)]
fn find_optimal_points(
    py: Python<'_>,
    x: Vec<f64>,
    y: Vec<f64>,
    deviation_metric: Vec<f64>,
    leakage_metric: Vec<f64>,
    target_value: f64,
    phase_threshold: f64,
    leakage_threshold: f64,
    clustering_radius_deg: f64,
    tolerances: Vec<f64>,
) -> PyResult<(Vec<usize>, Vec<Vec<usize>>)> {
    let config = OptimizerConfig {
        phase_threshold,
        leakage_threshold,
        clustering_radius_deg,
        tolerances,
        ..Default::default()
    };
    let result = py
        .allow_threads(|| {
            optima_core::find_optimal_points(
                &x,
                &y,
                &deviation_metric,
                &leakage_metric,
                target_value,
                &config,
            )
        })
        .map_err(to_py_err)?;
    Ok((result.representatives, result.clusters))
}

/// Wrapped deviation of each phase from the nearer of two targets.
#[pyfunction]
#[pyo3(signature = (phases, target, secondary = None))]
fn phase_deviations(phases: Vec<f64>, target: f64, secondary: Option<f64>) -> Vec<f64> {
    optima_core::phase_deviations(&phases, target, secondary.unwrap_or(2.0 * target))
}

/// Conditional phase `(phase_q1 - phase_q0) % 360` per sample (deg).
#[pyfunction]
fn conditional_phases(phase_q0: Vec<f64>, phase_q1: Vec<f64>) -> PyResult<Vec<f64>> {
    optima_core::conditional_phases(&phase_q0, &phase_q1).map_err(to_py_err)
}

/// Mean of `z` within normalised `radius` of sample `idx`.
///
/// Returns: tuple(mean: float, neighbors: list[int])
#[pyfunction]
fn average_around(
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    idx: usize,
    radius: f64,
) -> PyResult<(f64, Vec<usize>)> {
    if idx >= x.len() {
        return Err(PyValueError::new_err(format!(
            "index {idx} out of range for {} samples",
            x.len()
        )));
    }
    if z.len() != x.len() {
        return Err(PyValueError::new_err(format!(
            "z has length {}, expected {}",
            z.len(),
            x.len()
        )));
    }
    let n = x.len();
    let samples = sample_set(x, y, vec![0.0; n], vec![0.0; n])?;
    let nb = optima_core::average_around(&samples, &z, idx, radius);
    Ok((nb.mean, nb.neighbors))
}

/// Index of the lowest cost, as (optimal_idxs, clusters_by_indx).
#[pyfunction]
fn global_minimum(cost: Vec<f64>) -> PyResult<(Vec<usize>, Vec<Vec<usize>>)> {
    let result = optima_core::global_minimum(&cost).map_err(to_py_err)?;
    Ok((result.representatives, result.clusters))
}

/// Flatten an interpolated heatmap into parallel 1-D arrays.
///
/// Args:
///     x_int, y_int: Grid axes.
///     z_int: Rows of values, one row per y.
///     slice_above_len: Optional decimation so no axis exceeds this length.
#[pyfunction]
#[pyo3(signature = (x_int, y_int, z_int, slice_above_len = None))]
fn flatten_heatmap(
    x_int: Vec<f64>,
    y_int: Vec<f64>,
    z_int: Vec<Vec<f64>>,
    slice_above_len: Option<usize>,
) -> PyResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    let mut grid = RegularGrid::from_rows(x_int, y_int, z_int).map_err(to_py_err)?;
    if let Some(max_len) = slice_above_len {
        grid = grid.decimate(max_len).map_err(to_py_err)?;
    }
    Ok(grid.flatten())
}

/// Python module definition.
///
/// Exposes:
/// - `OptimizerConfig` — search configuration
/// - `RankedResult` — ranked optimal points
/// - `RustOptimalPointFinder` — reusable search
/// - `find_optimal_points`, `phase_deviations`, `conditional_phases`,
///   `average_around`, `global_minimum`, `flatten_heatmap`
#[pymodule]
fn optima_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyOptimizerConfig>()?;
    m.add_class::<PyRankedResult>()?;
    m.add_class::<PyOptimalPointFinder>()?;
    m.add_function(wrap_pyfunction!(find_optimal_points, m)?)?;
    m.add_function(wrap_pyfunction!(phase_deviations, m)?)?;
    m.add_function(wrap_pyfunction!(conditional_phases, m)?)?;
    m.add_function(wrap_pyfunction!(average_around, m)?)?;
    m.add_function(wrap_pyfunction!(global_minimum, m)?)?;
    m.add_function(wrap_pyfunction!(flatten_heatmap, m)?)?;
    Ok(())
}
