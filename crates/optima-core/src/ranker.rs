// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Cluster Ranker
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (get_optimal_pnts_indxs)
// ─────────────────────────────────────────────────────────────────────
//! Representative choice and cluster ordering.
//!
//! Each cluster is represented by its member with the lowest
//! disc-averaged leakage. Clusters are then ordered ascending by
//!
//!   weight = (L_rep / max_k L_rep) / cluster_size
//!
//! which favours low leakage and well-populated regions at once. When
//! every cluster has the same leakage the order is by size, largest first.

use rayon::prelude::*;

use optima_types::SampleSet;

use crate::neighborhood::average_around;

/// A cluster with its representative and ranking weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCluster {
    pub representative: usize,
    pub members: Vec<usize>,
    /// Disc-averaged leakage of the representative.
    pub local_leakage: f64,
    pub weight: f64,
}

/// Member of `members` with the lowest disc-averaged leakage.
///
/// Returns `(index, average)`. Ties go to the lowest sample index.
fn pick_representative(samples: &SampleSet, members: &[usize], radius: f64) -> (usize, f64) {
    let averages: Vec<f64> = members
        .par_iter()
        .map(|&i| average_around(samples, samples.leakage(), i, radius).mean)
        .collect();

    members
        .iter()
        .copied()
        .zip(averages)
        .fold(None, |best: Option<(usize, f64)>, (i, avg)| match best {
            Some((bi, bavg)) if bavg < avg || (bavg == avg && bi < i) => Some((bi, bavg)),
            _ => Some((i, avg)),
        })
        .unwrap_or((members[0], samples.leakage()[members[0]]))
}

/// Rank `clusters` best first.
///
/// `radius` is the neighbourhood radius in normalised coordinates.
/// Clusters must be non-empty.
pub fn rank_clusters(samples: &SampleSet, clusters: Vec<Vec<usize>>, radius: f64) -> Vec<RankedCluster> {
    let mut ranked: Vec<RankedCluster> = clusters
        .into_iter()
        .map(|members| {
            let (representative, local_leakage) = pick_representative(samples, &members, radius);
            RankedCluster {
                representative,
                members,
                local_leakage,
                weight: 0.0,
            }
        })
        .collect();

    let max_leakage = ranked
        .iter()
        .map(|c| c.local_leakage)
        .fold(f64::NEG_INFINITY, f64::max);

    for c in ranked.iter_mut() {
        // All-zero leakage: every cluster is equally good, rank by size
        let relative = if max_leakage > 0.0 {
            c.local_leakage / max_leakage
        } else {
            1.0
        };
        c.weight = relative / c.members.len() as f64;
    }

    let already_sorted = ranked.windows(2).all(|w| w[0].weight <= w[1].weight);
    if !already_sorted {
        log::debug!("Optimal points rescored based on low leakage areas");
    }
    ranked.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    ranked
}
