// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Search Configuration
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{OptimaError, OptimaResult};

/// Parameters of the optimal-point search.
///
/// The defaults reproduce the thresholds the flux-landscape analysis
/// has always run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum wrapped deviation (deg) from the target phase.
    /// Default: 5.0.
    pub phase_threshold: f64,

    /// Maximum leakage (same unit as the leakage metric, usually %).
    /// Default: 0.3.
    pub leakage_threshold: f64,

    /// Clustering radius in degrees of the x axis. Normalised by 360.
    /// Default: 10.0.
    pub clustering_radius_deg: f64,

    /// Neighbourhood radius for leakage averaging, as a multiple of the
    /// clustering radius.
    /// Default: 1.5.
    pub neighborhood_factor: f64,

    /// Escalation multipliers applied to both thresholds in turn.
    /// Scaling compounds: `[1, 2, 3]` tries x1, then x2, then x6.
    /// Default: [1, 2, 3].
    pub tolerances: Vec<f64>,

    /// Secondary phase target as a multiple of the primary target.
    /// Default: 2.0.
    pub secondary_target_factor: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            phase_threshold: 5.0,
            leakage_threshold: 0.3,
            clustering_radius_deg: 10.0,
            neighborhood_factor: 1.5,
            tolerances: vec![1.0, 2.0, 3.0],
            secondary_target_factor: 2.0,
        }
    }
}

impl OptimizerConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> OptimaResult<()> {
        if !self.phase_threshold.is_finite() || self.phase_threshold < 0.0 {
            return Err(OptimaError::Validation(format!(
                "phase_threshold must be finite and >= 0, got {}",
                self.phase_threshold
            )));
        }
        if !self.leakage_threshold.is_finite() || self.leakage_threshold < 0.0 {
            return Err(OptimaError::Validation(format!(
                "leakage_threshold must be finite and >= 0, got {}",
                self.leakage_threshold
            )));
        }
        if !self.clustering_radius_deg.is_finite() || self.clustering_radius_deg <= 0.0 {
            return Err(OptimaError::Validation(format!(
                "clustering_radius_deg must be finite and > 0, got {}",
                self.clustering_radius_deg
            )));
        }
        if !self.neighborhood_factor.is_finite() || self.neighborhood_factor <= 0.0 {
            return Err(OptimaError::Validation(format!(
                "neighborhood_factor must be finite and > 0, got {}",
                self.neighborhood_factor
            )));
        }
        if !self.secondary_target_factor.is_finite() {
            return Err(OptimaError::Validation(format!(
                "secondary_target_factor must be finite, got {}",
                self.secondary_target_factor
            )));
        }
        if self.tolerances.is_empty() {
            return Err(OptimaError::Validation(
                "tolerances must contain at least one multiplier".to_string(),
            ));
        }
        if let Some(bad) = self
            .tolerances
            .iter()
            .find(|t| !t.is_finite() || **t <= 0.0)
        {
            return Err(OptimaError::Validation(format!(
                "tolerances must be finite and > 0, got {bad}"
            )));
        }
        if self.tolerances.windows(2).any(|w| w[1] < w[0]) {
            return Err(OptimaError::Validation(format!(
                "tolerances must be ascending, got {:?}",
                self.tolerances
            )));
        }
        Ok(())
    }

    /// Clustering radius in normalised coordinates.
    pub fn clustering_radius(&self) -> f64 {
        self.clustering_radius_deg / crate::X_PERIOD_DEG
    }

    /// Neighbourhood radius in normalised coordinates.
    pub fn neighborhood_radius(&self) -> f64 {
        self.clustering_radius() * self.neighborhood_factor
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> OptimaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OptimaError::Config(format!("JSON parse error: {e}")))
    }
}
