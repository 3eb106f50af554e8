//! One-shot channel transport
//!
//! One unidirectional, single-value channel per region, created before
//! dispatch. The worker performs exactly one send and drops its end; the
//! coordinator performs at most one blocking receive per channel, in
//! region order. A channel closed without a value means the worker was
//! lost.

use std::thread;

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::cancel::CancelToken;
use crate::filter_engine::filter::{self, FilterParams, TileFilter};
use crate::filter_engine::pool::{self, PoolRun};
use crate::filter_engine::transport::{FilteredTile, RegionResult};

pub(crate) fn run(
    input: &PixelBuffer,
    regions: &[Region],
    filter: &dyn TileFilter,
    params: &FilterParams,
    cancel: &CancelToken,
) -> PoolRun {
    let results = thread::scope(|scope| {
        let mut receivers = Vec::with_capacity(regions.len());

        for region in regions {
            // Checkpoint: once cancelled, no further workers are spawned.
            if cancel.is_cancelled() {
                receivers.push(None);
                continue;
            }

            let (tx, rx) = flume::bounded(1);
            let view = input.view(region);
            let region = *region;
            scope.spawn(move || {
                pool::deliver(tx, || {
                    let pixels = filter::apply_checked(filter, region, &view, params)?;
                    Ok(FilteredTile { region, pixels })
                });
            });
            receivers.push(Some(rx));
        }

        pool::collect(regions, receivers, cancel, |_, tile| {
            RegionResult::Done(tile)
        })
    });

    PoolRun {
        results,
        arena: None,
    }
}
