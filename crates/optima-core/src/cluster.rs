// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Spatial Clusterer
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (get_optimal_pnts_indxs)
// ─────────────────────────────────────────────────────────────────────
//! Flat single-linkage clustering cut at a fixed radius.
//!
//! Two candidates share a cluster iff a chain of candidates connects them
//! with every hop no longer than the radius. Distances are Euclidean in
//! normalised coordinates. The grouping is read off a union-find forest
//! over the candidate list, so the clusters partition it.

use optima_types::SampleSet;

/// Disjoint-set forest with path compression and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Group `candidates` (indices into `samples`) into clusters.
///
/// Returns clusters of original sample indices. Members are ascending
/// within a cluster; clusters are ordered by their smallest member.
/// A negative `radius` links nothing, so every candidate stands alone.
pub fn cluster_candidates(samples: &SampleSet, candidates: &[usize], radius: f64) -> Vec<Vec<usize>> {
    let n = candidates.len();
    let mut sets = DisjointSet::new(n);
    let radius_sq = radius * radius;

    for a in 0..n {
        for b in (a + 1)..n {
            if radius >= 0.0 && samples.norm_dist_sq(candidates[a], candidates[b]) <= radius_sq {
                sets.union(a, b);
            }
        }
    }

    let mut sorted: Vec<usize> = (0..n).collect();
    sorted.sort_by_key(|&k| candidates[k]);

    // root slot -> cluster position, assigned in order of first appearance
    let mut slot: Vec<Option<usize>> = vec![None; n];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for k in sorted {
        let root = sets.find(k);
        let pos = *slot[root].get_or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[pos].push(candidates[k]);
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f64]) -> SampleSet {
        let n = xs.len();
        SampleSet::new(xs.to_vec(), vec![0.0; n], vec![0.0; n], vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_two_separate_groups() {
        let samples = line(&[0.0, 5.0, 10.0, 100.0, 105.0]);
        let clusters = cluster_candidates(&samples, &[0, 1, 2, 3, 4], 6.0 / 360.0);
        assert_eq!(clusters, vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_single_linkage_chains() {
        // 0-2 is 16 deg apart but chains through 1
        let samples = line(&[0.0, 8.0, 16.0]);
        let clusters = cluster_candidates(&samples, &[0, 1, 2], 9.0 / 360.0);
        assert_eq!(clusters, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_tiny_radius_isolates_everyone() {
        let samples = line(&[0.0, 1.0, 2.0, 3.0]);
        let clusters = cluster_candidates(&samples, &[3, 1, 2], 1e-9);
        assert_eq!(clusters, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_negative_radius_links_nothing() {
        let samples = line(&[0.0, 0.0, 1.0]);
        let clusters = cluster_candidates(&samples, &[0, 1, 2], -10.0 / 360.0);
        assert_eq!(clusters, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_indices_refer_to_original_arrays() {
        let samples = line(&[0.0, 50.0, 1.0, 51.0, 2.0]);
        let clusters = cluster_candidates(&samples, &[1, 2, 3, 4], 3.0 / 360.0);
        assert_eq!(clusters, vec![vec![1, 3], vec![2, 4]]);
    }

    #[test]
    fn test_y_axis_normalised_by_tau() {
        // dy = 0.1 rad -> 0.1/2pi ~ 0.0159 normalised, ~5.7 deg equivalent
        let samples = SampleSet::new(
            vec![0.0, 0.0],
            vec![0.0, 0.1],
            vec![0.0; 2],
            vec![0.0; 2],
        )
        .unwrap();
        assert_eq!(cluster_candidates(&samples, &[0, 1], 6.0 / 360.0).len(), 1);
        assert_eq!(cluster_candidates(&samples, &[0, 1], 5.0 / 360.0).len(), 2);
    }

    #[test]
    fn test_partition_covers_candidates_once() {
        let xs: Vec<f64> = (0..40).map(|i| (i * 37 % 101) as f64).collect();
        let samples = line(&xs);
        let candidates: Vec<usize> = (0..40).step_by(3).collect();
        for radius_deg in [0.5, 3.0, 10.0, 50.0, 500.0] {
            let clusters = cluster_candidates(&samples, &candidates, radius_deg / 360.0);
            let mut all: Vec<usize> = clusters.iter().flatten().copied().collect();
            all.sort_unstable();
            assert_eq!(all, candidates, "radius {radius_deg}");
            assert!(clusters.iter().all(|c| !c.is_empty()));
        }
    }

    #[test]
    fn test_no_candidates() {
        let samples = line(&[0.0]);
        assert!(cluster_candidates(&samples, &[], 1.0).is_empty());
    }
}
