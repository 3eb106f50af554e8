//! Run configuration and report types

use std::time::Duration;

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::common::EngineError;
use crate::filter_engine::filter::FilterParams;
use crate::filter_engine::timing::RunTimings;
use crate::filter_engine::transport::TransportKind;

/// Configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of horizontal bands to dispatch.
    pub tile_count: usize,
    /// Smoothing parameters shared read-only by all workers.
    pub params: FilterParams,
    /// How filtered data crosses the worker boundary.
    pub transport: TransportKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tile_count: num_cpus::get().max(1),
            params: FilterParams::default(),
            transport: TransportKind::Channel,
        }
    }
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }
}

/// Builder for RunConfig
#[derive(Default)]
pub struct RunConfigBuilder {
    tile_count: Option<usize>,
    params: Option<FilterParams>,
    transport: Option<TransportKind>,
}

impl RunConfigBuilder {
    pub fn tile_count(mut self, count: usize) -> Self {
        self.tile_count = Some(count);
        self
    }

    pub fn params(mut self, params: FilterParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> RunConfig {
        let default = RunConfig::default();
        RunConfig {
            tile_count: self.tile_count.unwrap_or(default.tile_count),
            params: self.params.unwrap_or(default.params),
            transport: self.transport.unwrap_or(default.transport),
        }
    }
}

/// Terminal state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every region completed and the output buffer was produced.
    Complete,
    /// At least one region failed; no output was produced.
    Failed,
    /// Cancellation was observed at a checkpoint; whichever regions
    /// completed are reported, but no output was produced.
    Cancelled,
}

impl RunStatus {
    pub(crate) fn from_outcomes(outcomes: &[RegionOutcome]) -> Self {
        if outcomes
            .iter()
            .any(|outcome| matches!(outcome, RegionOutcome::Skipped))
        {
            Self::Cancelled
        } else if outcomes
            .iter()
            .any(|outcome| matches!(outcome, RegionOutcome::Failed(_)))
        {
            Self::Failed
        } else {
            Self::Complete
        }
    }
}

/// What happened to one region.
#[derive(Debug)]
pub enum RegionOutcome {
    Completed,
    Failed(EngineError),
    /// Cancellation short-circuited this region's dispatch or collection.
    Skipped,
}

#[derive(Debug)]
pub struct RegionReport {
    pub region: Region,
    pub outcome: RegionOutcome,
}

/// Result of one run: terminal status, wall-clock timings, per-region
/// outcomes and, for a complete run, the reassembled buffer.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub elapsed: Duration,
    pub output: Option<PixelBuffer>,
    pub regions: Vec<RegionReport>,
    pub timings: RunTimings,
}

impl RunReport {
    pub fn completed_regions(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r.outcome, RegionOutcome::Completed))
            .count()
    }

    pub fn failed_regions(&self) -> impl Iterator<Item = &RegionReport> {
        self.regions
            .iter()
            .filter(|r| matches!(r.outcome, RegionOutcome::Failed(_)))
    }
}

/// Sequential baseline and parallel variant of the same pipeline over the
/// same input, for elapsed-time comparison.
#[derive(Debug)]
pub struct RunComparison {
    pub sequential: RunReport,
    pub parallel: RunReport,
}

impl RunComparison {
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.elapsed.as_secs_f64();
        if parallel > 0.0 {
            self.sequential.elapsed.as_secs_f64() / parallel
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("\nRun Comparison:");
        println!("{:-<60}", "");
        print_run("sequential", &self.sequential);
        print_run("parallel", &self.parallel);
        println!("{:-<60}", "");
        println!("{:<28} {:>11.2}x", "speedup", self.speedup());
    }
}

fn print_run(label: &str, report: &RunReport) {
    println!(
        "{:<28} {:>12.3}ms  ({:?})",
        label,
        report.elapsed.as_secs_f64() * 1000.0,
        report.status
    );
    for step in report.timings.steps() {
        println!(
            "  {:<26} {:>12.3}ms",
            step.name,
            step.duration.as_secs_f64() * 1000.0
        );
    }
}
