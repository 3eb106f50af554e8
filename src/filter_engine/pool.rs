//! Worker dispatch and collection
//!
//! One short-lived thread per region, created for that region and torn
//! down after delivering through its transport. Collection is by explicit
//! per-region handle, never by arrival order, so results land at the
//! correct offset regardless of which worker finishes first.

use std::panic::{self, AssertUnwindSafe};

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::cancel::CancelToken;
use crate::filter_engine::common::{EngineError, Result};
use crate::filter_engine::filter::{FilterParams, TileFilter};
use crate::filter_engine::transport::{RegionResult, TransportKind, arena, channel};

/// Outcome of one parallel pass over all regions.
pub struct PoolRun {
    /// One entry per region, in region order.
    pub results: Vec<RegionResult>,
    /// The fully written arena, present only for the shared-arena
    /// transport when every region completed.
    pub arena: Option<PixelBuffer>,
}

/// Dispatch one worker per region through the chosen transport and wait
/// for every spawned worker to terminate.
///
/// Cancellation stops further spawns and collections but never abandons a
/// worker that already started; the scope join always runs.
pub fn run(
    input: &PixelBuffer,
    regions: &[Region],
    filter: &dyn TileFilter,
    params: &FilterParams,
    transport: TransportKind,
    cancel: &CancelToken,
) -> PoolRun {
    match transport {
        TransportKind::Channel => channel::run(input, regions, filter, params, cancel),
        TransportKind::SharedArena => arena::run(input, regions, filter, params, cancel),
    }
}

/// Worker delivery path: run `compute`, then perform exactly one send.
///
/// A panicking filter must not tear down the coordinator's scope, so the
/// payload is caught and the sender dropped without a send; the collector
/// observes the disconnect as `WorkerLost`.
pub(crate) fn deliver<T>(tx: flume::Sender<Result<T>>, compute: impl FnOnce() -> Result<T>) {
    match panic::catch_unwind(AssertUnwindSafe(compute)) {
        Ok(outcome) => {
            let _ = tx.send(outcome);
        }
        Err(_) => drop(tx),
    }
}

/// Receive every spawned region's delivery, in region order.
///
/// A `None` slot means the spawn checkpoint skipped that region. Once the
/// token is observed set, remaining receives are skipped rather than
/// awaited.
pub(crate) fn collect<T>(
    regions: &[Region],
    receivers: Vec<Option<flume::Receiver<Result<T>>>>,
    cancel: &CancelToken,
    mut on_done: impl FnMut(Region, T) -> RegionResult,
) -> Vec<RegionResult> {
    regions
        .iter()
        .zip(receivers)
        .map(|(region, receiver)| {
            let Some(rx) = receiver else {
                return RegionResult::Skipped;
            };
            if cancel.is_cancelled() {
                return RegionResult::Skipped;
            }
            match rx.recv() {
                Ok(Ok(value)) => on_done(*region, value),
                Ok(Err(err)) => RegionResult::Failed(err),
                Err(_) => RegionResult::Failed(EngineError::WorkerLost {
                    row_start: region.row_start,
                    row_end: region.row_end,
                }),
            }
        })
        .collect()
}
