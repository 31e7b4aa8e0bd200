// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Phase Deviation
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (process_data, get_optimal_pnts_indxs)
// ─────────────────────────────────────────────────────────────────────
//! Wrapped angular deviation of a measured phase from its targets.
//!
//! The deviation is the shorter way round the 360° circle, so 0° and
//! 360° are equally far from 180°. Two targets are accepted; callers pass
//! `2 * target` as the secondary so the harmonic also counts as on target.

use optima_types::{OptimaError, OptimaResult};

const PERIOD_DEG: f64 = 360.0;
const HALF_PERIOD_DEG: f64 = 180.0;

/// Shortest angular distance (deg) between `a` and `b`, in [0, 180].
#[inline]
fn wrapped_distance(a: f64, b: f64) -> f64 {
    ((a - b + HALF_PERIOD_DEG).rem_euclid(PERIOD_DEG) - HALF_PERIOD_DEG).abs()
}

/// Deviation of one phase from the nearer of `target` and `secondary`.
#[inline]
pub fn phase_deviation(phase: f64, target: f64, secondary: f64) -> f64 {
    wrapped_distance(phase, target).min(wrapped_distance(phase, secondary))
}

/// Element-wise [`phase_deviation`].
pub fn phase_deviations(phases: &[f64], target: f64, secondary: f64) -> Vec<f64> {
    phases
        .iter()
        .map(|&p| phase_deviation(p, target, secondary))
        .collect()
}

/// Conditional phase (deg) from the single-qubit phases of both qubits:
/// `(phase_q1 - phase_q0) mod 360`, in [0, 360).
#[inline]
pub fn conditional_phase(phase_q0: f64, phase_q1: f64) -> f64 {
    (phase_q1 - phase_q0).rem_euclid(PERIOD_DEG)
}

/// Element-wise [`conditional_phase`] over two parallel sweeps.
pub fn conditional_phases(phase_q0: &[f64], phase_q1: &[f64]) -> OptimaResult<Vec<f64>> {
    if phase_q0.len() != phase_q1.len() {
        return Err(OptimaError::Validation(format!(
            "phase arrays differ in length: q0={}, q1={}",
            phase_q0.len(),
            phase_q1.len()
        )));
    }
    Ok(phase_q0
        .iter()
        .zip(phase_q1)
        .map(|(&q0, &q1)| conditional_phase(q0, q1))
        .collect())
}

/// A primary/secondary target pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiTargetDeviation {
    pub target: f64,
    pub secondary: f64,
}

impl MultiTargetDeviation {
    pub fn new(target: f64, secondary: f64) -> Self {
        Self { target, secondary }
    }

    /// Target plus its harmonic `2 * target`.
    pub fn default_for(target: f64) -> Self {
        Self::new(target, 2.0 * target)
    }

    pub fn deviation(&self, phase: f64) -> f64 {
        phase_deviation(phase, self.target, self.secondary)
    }

    pub fn deviations(&self, phases: &[f64]) -> Vec<f64> {
        phase_deviations(phases, self.target, self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_target() {
        assert_eq!(phase_deviation(180.0, 180.0, 360.0), 0.0);
    }

    #[test]
    fn test_wraparound() {
        // 0 and 360 sit on the secondary target of 180
        assert!(phase_deviation(0.0, 180.0, 360.0).abs() < 1e-12);
        assert!(phase_deviation(360.0, 180.0, 360.0).abs() < 1e-12);
        assert!((wrapped_distance(359.0, 1.0) - 2.0).abs() < 1e-12);
        assert!((wrapped_distance(-170.0, 170.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_target_wins() {
        // 100 is 80 from 180 and 100 from 0/360
        assert!((phase_deviation(100.0, 180.0, 360.0) - 80.0).abs() < 1e-12);
        // 300 is 120 from 180 and 60 from 360
        assert!((phase_deviation(300.0, 180.0, 360.0) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_by_half_period() {
        for i in -720..=720 {
            let d = phase_deviation(i as f64 * 0.9, 37.0, 74.0);
            assert!((0.0..=180.0).contains(&d), "deviation {d} out of range");
        }
    }

    #[test]
    fn test_unbounded_input() {
        assert!((phase_deviation(180.0 + 3.0 * 360.0 + 2.0, 180.0, 360.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_target_default() {
        let dev = MultiTargetDeviation::default_for(90.0);
        assert_eq!(dev.secondary, 180.0);
        assert!((dev.deviation(175.0) - 5.0).abs() < 1e-12);
        assert_eq!(dev.deviations(&[90.0, 180.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_conditional_phase_wraps_into_period() {
        assert_eq!(conditional_phase(10.0, 190.0), 180.0);
        assert_eq!(conditional_phase(190.0, 10.0), 180.0);
        assert_eq!(conditional_phase(30.0, 20.0), 350.0);
        assert_eq!(conditional_phase(0.0, 720.0), 0.0);
    }

    #[test]
    fn test_conditional_phases() {
        let cp = conditional_phases(&[0.0, 90.0], &[180.0, 45.0]).unwrap();
        assert_eq!(cp, vec![180.0, 315.0]);
        assert!(matches!(
            conditional_phases(&[0.0], &[]),
            Err(OptimaError::Validation(_))
        ));
    }
}
