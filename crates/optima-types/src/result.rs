// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Ranked Result
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Ranked optimal points of a sweep.
///
/// `representatives[k]` is the chosen sample of `clusters[k]`; entries are
/// ordered best first. All indices refer to the original sample arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub representatives: Vec<usize>,
    pub clusters: Vec<Vec<usize>>,
    /// Cumulative threshold multiplier that produced the candidates, or
    /// `None` if the ladder was exhausted.
    pub tolerance_used: Option<f64>,
    /// Number of times the thresholds were relaxed.
    pub escalations: usize,
}

impl RankedResult {
    /// Result of an exhausted tolerance ladder.
    pub fn empty(escalations: usize) -> Self {
        Self {
            escalations,
            ..Default::default()
        }
    }

    /// A lone candidate: it is its own cluster.
    pub fn singleton(index: usize, tolerance_used: f64, escalations: usize) -> Self {
        Self {
            representatives: vec![index],
            clusters: vec![vec![index]],
            tolerance_used: Some(tolerance_used),
            escalations,
        }
    }

    /// Number of ranked points.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Best point, if any.
    pub fn best(&self) -> Option<usize> {
        self.representatives.first().copied()
    }

    /// Iterate `(representative, cluster)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.representatives
            .iter()
            .copied()
            .zip(self.clusters.iter().map(Vec::as_slice))
    }

    /// Every candidate index, ascending.
    pub fn candidates(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self.clusters.iter().flatten().copied().collect();
        all.sort_unstable();
        all
    }

    /// Reorder ranks by `order`, a permutation of `0..len()`.
    pub fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.len());
        self.representatives = order.iter().map(|&k| self.representatives[k]).collect();
        self.clusters = order.iter().map(|&k| self.clusters[k].clone()).collect();
    }
}
