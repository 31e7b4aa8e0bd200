// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Optimal Point Search
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Extraction of ranked optimal operating points from a noisy
//! two-parameter sweep (e.g. the two flux knobs of a CZ gate).
//!
//! Pipeline:
//!   1. `selector`     — phase/leakage thresholds, sweep-edge exclusion,
//!                       tolerance ladder
//!   2. `cluster`      — single-linkage clustering cut at a fixed radius
//!   3. `neighborhood` — leakage averaged over a local disc
//!   4. `ranker`       — representative per cluster, weight ordering
//!
//! # Invariants
//!
//! 1. **Sweep edges are never candidates**: a sample whose x or y equals
//!    that axis' global extremum is dropped before any threshold test.
//!
//! 2. **Clusters partition the candidates**: every candidate lands in
//!    exactly one cluster, because clusters are read off a single
//!    union-find forest built over the candidate list.
//!
//! 3. **Representatives belong to their cluster** and ties between
//!    members resolve to the lowest sample index.
//!
//! 4. **Deterministic output**: parallel neighbourhood averaging keeps
//!    input order, and the rank sort is stable.

pub mod cluster;
pub mod deviation;
pub mod interp;
pub mod neighborhood;
pub mod optimizer;
pub mod ranker;
pub mod selector;
pub mod waveform;

pub use cluster::cluster_candidates;
pub use deviation::{
    conditional_phase, conditional_phases, phase_deviation, phase_deviations,
    MultiTargetDeviation,
};
pub use interp::{ExternalInterpolator, HeatmapInterpolator, RegularGrid};
pub use neighborhood::{average_around, Neighborhood};
pub use optimizer::{find_optimal_points, global_minimum, OptimalPointFinder};
pub use ranker::{rank_clusters, RankedCluster};
pub use selector::{CandidateSelector, Selection, SelectionReport};
pub use waveform::{
    generate_for_result, rescore_by_spikes, spike_penalty, ExternalWaveform, WaveformGenerator,
};
