// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Candidate Selector
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (get_optimal_pnts_indxs)
// ─────────────────────────────────────────────────────────────────────
//! Threshold filter with a tolerance ladder.
//!
//! A sample is a candidate when its phase deviation and its leakage are
//! both within threshold and it does not sit on the edge of the sweep.
//! If nothing qualifies, both thresholds are multiplied by the next
//! tolerance and the filter runs again. The scaling compounds: after
//! `[1, 2, 3]` the thresholds stand at six times their base values.

use optima_types::{OptimizerConfig, SampleSet};

use crate::deviation::MultiTargetDeviation;

/// Outcome of the tolerance ladder.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every tolerance exhausted without a candidate.
    Empty,
    /// Exactly one candidate; clustering is skipped.
    Singleton(usize),
    /// Two or more candidates, ascending by sample index.
    Candidates(Vec<usize>),
}

/// Selection outcome plus the thresholds it was reached with.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionReport {
    pub selection: Selection,
    /// Cumulative multiplier applied to the base thresholds.
    pub tolerance: f64,
    pub phase_threshold: f64,
    pub leakage_threshold: f64,
    /// Ladder steps taken beyond the first.
    pub escalations: usize,
}

/// Tolerance-ladder candidate filter.
pub struct CandidateSelector<'a> {
    config: &'a OptimizerConfig,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(config: &'a OptimizerConfig) -> Self {
        Self { config }
    }

    /// Indices passing both thresholds, excluding sweep edges.
    ///
    /// `deviation` must be parallel to the samples.
    pub fn filter(
        samples: &SampleSet,
        deviation: &[f64],
        phase_threshold: f64,
        leakage_threshold: f64,
    ) -> Vec<usize> {
        let bounds = samples.bounds();
        let leakage = samples.leakage();
        (0..samples.len())
            .filter(|&i| {
                deviation[i] <= phase_threshold
                    && leakage[i] <= leakage_threshold
                    && !samples.is_boundary(i, &bounds)
            })
            .collect()
    }

    /// Run the tolerance ladder against `target_phase`.
    pub fn select(&self, samples: &SampleSet, target_phase: f64) -> SelectionReport {
        let targets = MultiTargetDeviation::new(
            target_phase,
            self.config.secondary_target_factor * target_phase,
        );
        // Deviation is independent of the tolerance step
        let deviation = targets.deviations(samples.phase());

        let mut phase_thr = self.config.phase_threshold;
        let mut leakage_thr = self.config.leakage_threshold;
        let mut tolerance = 1.0;
        let last = self.config.tolerances.len().saturating_sub(1);

        for (step, &tol) in self.config.tolerances.iter().enumerate() {
            phase_thr *= tol;
            leakage_thr *= tol;
            tolerance *= tol;

            let selected = Self::filter(samples, &deviation, phase_thr, leakage_thr);
            let selection = match selected.len() {
                0 => {
                    log::warn!(
                        "No optimal points found with |target_phase - phase| <= {phase_thr:.4} and leakage <= {leakage_thr:.4}"
                    );
                    if step == last {
                        Selection::Empty
                    } else {
                        log::warn!(
                            "Increasing tolerance for phase and leakage thresholds to x{}",
                            self.config.tolerances[step + 1]
                        );
                        continue;
                    }
                }
                1 => Selection::Singleton(selected[0]),
                _ => Selection::Candidates(selected),
            };
            return SelectionReport {
                selection,
                tolerance,
                phase_threshold: phase_thr,
                leakage_threshold: leakage_thr,
                escalations: step,
            };
        }

        // Reached only with an empty ladder, which validation rejects.
        SelectionReport {
            selection: Selection::Empty,
            tolerance,
            phase_threshold: phase_thr,
            leakage_threshold: leakage_thr,
            escalations: 0,
        }
    }
}
