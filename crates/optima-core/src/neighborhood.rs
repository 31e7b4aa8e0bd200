// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Local Neighbourhood Scorer
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py (av_around)
// ─────────────────────────────────────────────────────────────────────
//! Metric averaged over a disc around one sample.
//!
//! Single leakage samples are noisy; the disc mean over every sample
//! (candidate or not) is the robust proxy used for ranking.

use optima_types::SampleSet;

/// Disc average around a query sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    /// Arithmetic mean of the metric over `neighbors`.
    pub mean: f64,
    /// Samples within the radius, ascending. Includes the query itself.
    pub neighbors: Vec<usize>,
}

/// Average `metric` over all samples within `radius` of sample `index`.
///
/// Distances are compared squared, inclusive of the radius. A query with
/// no neighbours, which includes any negative `radius`, falls back to its
/// own metric value.
pub fn average_around(samples: &SampleSet, metric: &[f64], index: usize, radius: f64) -> Neighborhood {
    let radius_sq = radius * radius;
    let neighbors: Vec<usize> = (0..samples.len())
        .filter(|&j| radius >= 0.0 && samples.norm_dist_sq(index, j) <= radius_sq)
        .collect();

    if neighbors.is_empty() {
        log::debug!(
            "Sample {index} has no neighbours within r={radius:.6}; using its own value"
        );
        return Neighborhood {
            mean: metric[index],
            neighbors,
        };
    }

    let sum: f64 = neighbors.iter().map(|&j| metric[j]).sum();
    Neighborhood {
        mean: sum / neighbors.len() as f64,
        neighbors,
    }
}
