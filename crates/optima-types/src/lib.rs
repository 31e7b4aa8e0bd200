// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Sample arena, search configuration, ranked results, and the error
//! hierarchy shared by the optimal-point search and its bindings.

pub mod config;
pub mod error;
pub mod result;
pub mod sample;

pub use config::OptimizerConfig;
pub use error::{OptimaError, OptimaResult};
pub use result::RankedResult;
pub use sample::{SampleSet, SweepBounds, X_PERIOD_DEG, Y_PERIOD_RAD};
