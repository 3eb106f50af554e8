//! Tiled parallel filter engine
//!
//! This module provides a structured approach to band-parallel image
//! smoothing, with separate modules for tiling, filtering, worker
//! transport, reassembly and run orchestration.

pub mod buffer;
pub mod cancel;
pub mod common;
pub mod filter;
pub mod pool;
pub mod reassemble;
pub mod run;
pub mod tiler;
pub mod timing;
pub mod transport;

#[cfg(test)]
mod tests;

pub use common::{EngineError, Result};

pub use buffer::{PixelBuffer, Region, TileView};

pub use cancel::{CancelToken, hook_sigint};

pub use filter::{FilterParams, GaussianSmoother, TileFilter};

pub use tiler::tile;

pub use timing::{RunTimings, StepTiming, Timer};

pub use transport::{FilteredTile, RegionResult, TransportKind};

pub use run::{
    RegionOutcome, RegionReport, RunComparison, RunConfig, RunConfigBuilder, RunCoordinator,
    RunReport, RunStatus,
};
