// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Optimal Point Finder
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (get_optimal_pnts_indxs)
// ─────────────────────────────────────────────────────────────────────
//! Entry point: selector → clusterer → neighbourhood scorer → ranker.
//!
//! Every call is a pure function of its inputs. Invalid input is
//! rejected before any computation; an exhausted tolerance ladder is a
//! normal, empty result.

use optima_types::{OptimaError, OptimaResult, OptimizerConfig, RankedResult, SampleSet};

use crate::cluster::cluster_candidates;
use crate::ranker::rank_clusters;
use crate::selector::{CandidateSelector, Selection};

/// Optimal-point search with a validated configuration.
#[derive(Debug, Clone)]
pub struct OptimalPointFinder {
    config: OptimizerConfig,
}

impl OptimalPointFinder {
    pub fn new(config: OptimizerConfig) -> OptimaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Read-only access to config.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Ranked optimal points of `samples` for `target_phase` (deg).
    pub fn find(&self, samples: &SampleSet, target_phase: f64) -> OptimaResult<RankedResult> {
        if !target_phase.is_finite() {
            return Err(OptimaError::Validation(format!(
                "target phase must be finite, got {target_phase}"
            )));
        }

        let report = CandidateSelector::new(&self.config).select(samples, target_phase);
        let candidates = match report.selection {
            Selection::Empty => return Ok(RankedResult::empty(report.escalations)),
            Selection::Singleton(i) => {
                log::info!("Single optimal point {i} at tolerance x{}", report.tolerance);
                return Ok(RankedResult::singleton(i, report.tolerance, report.escalations));
            }
            Selection::Candidates(c) => c,
        };

        let clusters = cluster_candidates(samples, &candidates, self.config.clustering_radius());
        let ranked = rank_clusters(samples, clusters, self.config.neighborhood_radius());

        log::info!(
            "{} candidates in {} clusters at tolerance x{}",
            candidates.len(),
            ranked.len(),
            report.tolerance
        );

        let (representatives, clusters) = ranked
            .into_iter()
            .map(|c| (c.representative, c.members))
            .unzip();
        Ok(RankedResult {
            representatives,
            clusters,
            tolerance_used: Some(report.tolerance),
            escalations: report.escalations,
        })
    }
}

/// One-shot search over parallel arrays.
///
/// `phase` is the deviation metric (deg), `leakage` the error metric.
pub fn find_optimal_points(
    x: &[f64],
    y: &[f64],
    phase: &[f64],
    leakage: &[f64],
    target_phase: f64,
    config: &OptimizerConfig,
) -> OptimaResult<RankedResult> {
    let finder = OptimalPointFinder::new(config.clone())?;
    let samples = SampleSet::new(x.to_vec(), y.to_vec(), phase.to_vec(), leakage.to_vec())?;
    finder.find(&samples, target_phase)
}

/// The sample with the lowest `cost`, as a one-point result.
///
/// Used instead of the clustered search when only the global optimum of a
/// cost function is wanted. NaN costs never win.
pub fn global_minimum(cost: &[f64]) -> OptimaResult<RankedResult> {
    let best = cost
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_nan())
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .ok_or_else(|| OptimaError::Validation("cost has no finite entry".to_string()))?;
    Ok(RankedResult::singleton(best, 1.0, 0))
}
