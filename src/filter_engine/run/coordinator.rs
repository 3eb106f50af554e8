use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::cancel::CancelToken;
use crate::filter_engine::common::Result;
use crate::filter_engine::filter::{self, GaussianSmoother, TileFilter};
use crate::filter_engine::pool;
use crate::filter_engine::reassemble;
use crate::filter_engine::run::types::{
    RegionOutcome, RegionReport, RunComparison, RunConfig, RunReport, RunStatus,
};
use crate::filter_engine::tiler;
use crate::filter_engine::timing::{RunTimings, Timer};
use crate::filter_engine::transport::{FilteredTile, RegionResult, TransportKind};

/// Orchestrates one execution: tile, dispatch, collect, reassemble.
///
/// The sequential baseline path shares the tiler and the filter seam with
/// the parallel path, so both produce byte-identical output and their
/// elapsed times are directly comparable.
pub struct RunCoordinator<F: TileFilter> {
    filter: F,
    config: RunConfig,
}

impl RunCoordinator<GaussianSmoother> {
    pub fn new(config: RunConfig) -> Self {
        Self {
            filter: GaussianSmoother,
            config,
        }
    }
}

impl<F: TileFilter> RunCoordinator<F> {
    pub fn with_filter(filter: F, config: RunConfig) -> Self {
        Self { filter, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// One worker per region, results collected through the configured
    /// transport.
    ///
    /// Only tiler validation aborts with an error; per-region failures and
    /// cancellation are reported through the run status.
    #[instrument(skip(self, input, cancel), fields(width = input.width(), height = input.height()))]
    pub fn run_parallel(&self, input: &PixelBuffer, cancel: &CancelToken) -> Result<RunReport> {
        let started = Instant::now();
        let mut timings = RunTimings::new();

        let timer = Timer::start("tile");
        let regions = tiler::tile(input, self.config.tile_count)?;
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        info!(
            regions = regions.len(),
            transport = ?self.config.transport,
            "dispatching parallel run"
        );

        let timer = Timer::start("filter");
        let pool_run = pool::run(
            input,
            &regions,
            &self.filter,
            &self.config.params,
            self.config.transport,
            cancel,
        );
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        let timer = Timer::start("reassemble");
        let mut outcomes = Vec::with_capacity(regions.len());
        let mut tiles = Vec::new();
        for result in pool_run.results {
            match result {
                RegionResult::Done(tile) => {
                    tiles.push(tile);
                    outcomes.push(RegionOutcome::Completed);
                }
                RegionResult::Written => outcomes.push(RegionOutcome::Completed),
                RegionResult::Failed(err) => outcomes.push(RegionOutcome::Failed(err)),
                RegionResult::Skipped => outcomes.push(RegionOutcome::Skipped),
            }
        }

        let status = RunStatus::from_outcomes(&outcomes);
        let output = match (status, self.config.transport) {
            (RunStatus::Complete, TransportKind::SharedArena) => pool_run.arena,
            (RunStatus::Complete, TransportKind::Channel) => Some(reassemble::combine(
                &tiles,
                input.width(),
                input.channels(),
                regions.len(),
            )?),
            _ => None,
        };
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        Ok(self.finish(started, status, output, regions, outcomes, timings))
    }

    /// Baseline path: same tiling, same filter, one region at a time in
    /// the calling thread, no workers.
    #[instrument(skip(self, input, cancel), fields(width = input.width(), height = input.height()))]
    pub fn run_sequential(&self, input: &PixelBuffer, cancel: &CancelToken) -> Result<RunReport> {
        let started = Instant::now();
        let mut timings = RunTimings::new();

        let timer = Timer::start("tile");
        let regions = tiler::tile(input, self.config.tile_count)?;
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        info!(regions = regions.len(), "starting sequential run");

        let timer = Timer::start("filter");
        let mut outcomes = Vec::with_capacity(regions.len());
        let mut tiles = Vec::new();
        for region in &regions {
            // Checkpoint: once cancelled, remaining regions are skipped.
            if cancel.is_cancelled() {
                outcomes.push(RegionOutcome::Skipped);
                continue;
            }
            match filter::apply_checked(
                &self.filter,
                *region,
                &input.view(region),
                &self.config.params,
            ) {
                Ok(pixels) => {
                    tiles.push(FilteredTile {
                        region: *region,
                        pixels,
                    });
                    outcomes.push(RegionOutcome::Completed);
                }
                Err(err) => outcomes.push(RegionOutcome::Failed(err)),
            }
        }
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        let timer = Timer::start("reassemble");
        let status = RunStatus::from_outcomes(&outcomes);
        let output = match status {
            RunStatus::Complete => Some(reassemble::combine(
                &tiles,
                input.width(),
                input.channels(),
                regions.len(),
            )?),
            _ => None,
        };
        let (name, duration) = timer.stop();
        timings.record(name, duration);

        Ok(self.finish(started, status, output, regions, outcomes, timings))
    }

    /// Run the sequential baseline, then the parallel variant, over the
    /// same input and configuration.
    pub fn compare(&self, input: &PixelBuffer, cancel: &CancelToken) -> Result<RunComparison> {
        let sequential = self.run_sequential(input, cancel)?;
        let parallel = self.run_parallel(input, cancel)?;
        Ok(RunComparison {
            sequential,
            parallel,
        })
    }

    fn finish(
        &self,
        started: Instant,
        status: RunStatus,
        output: Option<PixelBuffer>,
        regions: Vec<Region>,
        outcomes: Vec<RegionOutcome>,
        timings: RunTimings,
    ) -> RunReport {
        let report = RunReport {
            status,
            elapsed: started.elapsed(),
            output,
            regions: regions
                .into_iter()
                .zip(outcomes)
                .map(|(region, outcome)| RegionReport { region, outcome })
                .collect(),
            timings,
        };

        match report.status {
            RunStatus::Complete => info!(
                elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                "run complete"
            ),
            RunStatus::Failed => warn!(
                failed = report.regions.len() - report.completed_regions(),
                "run failed"
            ),
            RunStatus::Cancelled => warn!(
                completed = report.completed_regions(),
                total = report.regions.len(),
                "run cancelled"
            ),
        }

        report
    }
}
