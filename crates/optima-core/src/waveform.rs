// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Waveform Generator Interface
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (Conditional_Oscillation_Heatmap_Analysis.process_data)
// ─────────────────────────────────────────────────────────────────────
//! Interface to the control-waveform generator and the spike rescoring
//! applied to ranked points once their waveforms are known.
//!
//! The generator runs only on search output, never inside the search.

use optima_types::{OptimaError, OptimaResult, RankedResult, SampleSet};

/// Amplitude above which a waveform counts as spiked.
pub const SPIKE_AMPLITUDE: f64 = 1.25;

/// Produces the control waveform for an operating point `(x, y)`.
pub trait WaveformGenerator: Send + Sync {
    fn generate(&self, x: f64, y: f64) -> OptimaResult<Vec<f64>>;
}

type GenerateFn = Box<dyn Fn(f64, f64) -> Result<Vec<f64>, String> + Send + Sync>;

/// Waveform generator backed by a caller-supplied function.
pub struct ExternalWaveform {
    generate_fn: GenerateFn,
}

impl ExternalWaveform {
    pub fn new(generate_fn: impl Fn(f64, f64) -> Result<Vec<f64>, String> + Send + Sync + 'static) -> Self {
        Self {
            generate_fn: Box::new(generate_fn),
        }
    }
}

impl WaveformGenerator for ExternalWaveform {
    fn generate(&self, x: f64, y: f64) -> OptimaResult<Vec<f64>> {
        (self.generate_fn)(x, y).map_err(OptimaError::Collaborator)
    }
}

/// Waveforms for every representative of `result`, in rank order.
///
/// `result` must index into `samples`; a representative past the end is
/// a validation error.
pub fn generate_for_result(
    generator: &dyn WaveformGenerator,
    samples: &SampleSet,
    result: &RankedResult,
) -> OptimaResult<Vec<Vec<f64>>> {
    result
        .representatives
        .iter()
        .map(|&i| {
            if i >= samples.len() {
                return Err(OptimaError::Validation(format!(
                    "representative {i} out of range for {} samples",
                    samples.len()
                )));
            }
            generator.generate(samples.x()[i], samples.y()[i])
        })
        .collect()
}

/// Penalty for amplitude spikes, in [0, 1].
///
/// Zero unless some sample exceeds [`SPIKE_AMPLITUDE`]; otherwise
/// `(max - mean|w|) / max`, so sharp isolated peaks score worst.
pub fn spike_penalty(waveform: &[f64]) -> f64 {
    let max = waveform.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max.is_nan() || max <= SPIKE_AMPLITUDE {
        return 0.0;
    }
    let mean_abs = waveform.iter().map(|v| v.abs()).sum::<f64>() / waveform.len() as f64;
    (max - mean_abs) / max
}

/// Reorder `result` ascending by the spike penalty of its waveforms.
///
/// `waveforms` must be parallel to `result.representatives`. Equal
/// penalties keep their current rank.
pub fn rescore_by_spikes(result: &mut RankedResult, waveforms: &[Vec<f64>]) -> OptimaResult<Vec<f64>> {
    if waveforms.len() != result.len() {
        return Err(OptimaError::Validation(format!(
            "got {} waveforms for {} ranked points",
            waveforms.len(),
            result.len()
        )));
    }
    let penalties: Vec<f64> = waveforms.iter().map(|w| spike_penalty(w)).collect();
    let mut order: Vec<usize> = (0..penalties.len()).collect();
    order.sort_by(|&a, &b| penalties[a].total_cmp(&penalties[b]));
    result.reorder(&order);
    Ok(order.iter().map(|&k| penalties[k]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked() -> RankedResult {
        RankedResult {
            representatives: vec![1, 3],
            clusters: vec![vec![1], vec![3]],
            tolerance_used: Some(1.0),
            escalations: 0,
        }
    }

    #[test]
    fn test_smooth_waveform_has_no_penalty() {
        assert_eq!(spike_penalty(&[0.0, 0.5, 1.0, 0.5, 0.0]), 0.0);
        assert_eq!(spike_penalty(&[]), 0.0);
    }

    #[test]
    fn test_spike_penalty() {
        // max 2.0, mean |w| = 0.5
        let p = spike_penalty(&[0.0, 0.0, 2.0, 0.0]);
        assert!((p - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_rescore_moves_spiked_point_down() {
        let mut result = ranked();
        let waveforms = vec![vec![0.0, 2.0, 0.0], vec![0.5, 1.0, 0.5]];
        let penalties = rescore_by_spikes(&mut result, &waveforms).unwrap();
        assert_eq!(result.representatives, vec![3, 1]);
        assert_eq!(penalties[0], 0.0);
        assert!(penalties[1] > 0.0);
    }

    #[test]
    fn test_rescore_length_mismatch() {
        let mut result = ranked();
        assert!(rescore_by_spikes(&mut result, &[vec![0.0]]).is_err());
    }

    #[test]
    fn test_generate_for_result_uses_representative_coordinates() {
        let samples = SampleSet::new(
            vec![0.0, 10.0, 20.0, 30.0],
            vec![0.0, 0.1, 0.2, 0.3],
            vec![0.0; 4],
            vec![0.0; 4],
        )
        .unwrap();
        let generator = ExternalWaveform::new(|x, y| Ok(vec![x, y]));
        let waves = generate_for_result(&generator, &samples, &ranked()).unwrap();
        assert_eq!(waves, vec![vec![10.0, 0.1], vec![30.0, 0.3]]);
    }

    #[test]
    fn test_generator_failure_propagates() {
        let samples = SampleSet::new(vec![0.0; 4], vec![0.0; 4], vec![0.0; 4], vec![0.0; 4]).unwrap();
        let generator = ExternalWaveform::new(|_, _| Err("lutman offline".to_string()));
        let err = generate_for_result(&generator, &samples, &ranked()).unwrap_err();
        assert!(matches!(err, OptimaError::Collaborator(_)));
    }

    #[test]
    fn test_result_from_other_sweep_rejected() {
        let samples = SampleSet::new(vec![0.0, 10.0], vec![0.0; 2], vec![0.0; 2], vec![0.0; 2]).unwrap();
        let generator = ExternalWaveform::new(|x, y| Ok(vec![x, y]));
        let err = generate_for_result(&generator, &samples, &RankedResult::singleton(5, 1.0, 0)).unwrap_err();
        assert!(matches!(err, OptimaError::Validation(_)));
    }
}
