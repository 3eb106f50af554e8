//! Shared-arena transport
//!
//! One arena sized exactly like the input is allocated before dispatch.
//! Each worker receives a disjoint write slice issued exactly once by
//! consuming `split_at_mut`, so two regions can never alias and no lock is
//! needed. Workers deliver a completion token, not pixel data; the arena
//! is read only after every token has been observed.

use std::mem;
use std::thread;

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::cancel::CancelToken;
use crate::filter_engine::filter::{self, FilterParams, TileFilter};
use crate::filter_engine::pool::{self, PoolRun};
use crate::filter_engine::transport::RegionResult;

pub(crate) fn run(
    input: &PixelBuffer,
    regions: &[Region],
    filter: &dyn TileFilter,
    params: &FilterParams,
    cancel: &CancelToken,
) -> PoolRun {
    let mut arena = PixelBuffer::new(input.width(), input.height(), input.channels());

    let results = thread::scope(|scope| {
        let mut receivers = Vec::with_capacity(regions.len());
        let mut rest: &mut [u8] = arena.bytes_mut();

        for region in regions {
            // Issue the write slice even for skipped regions so later
            // offsets stay aligned with the tiler's order. Taking `rest`
            // keeps each slice borrowed from the arena itself, not from
            // this loop iteration.
            let (slice, tail) = mem::take(&mut rest).split_at_mut(region.byte_len());
            rest = tail;

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
                    // Read and write extents both come from the same
                    // region, and the filter output length is validated
                    // against it before the copy.
                    let pixels = filter::apply_checked(filter, region, &view, params)?;
                    slice.copy_from_slice(&pixels);
                    Ok(())
                });
            });
            receivers.push(Some(rx));
        }

        pool::collect(regions, receivers, cancel, |_, _| RegionResult::Written)
    });

    let complete = results.iter().all(|r| matches!(r, RegionResult::Written));
    PoolRun {
        results,
        arena: complete.then_some(arena),
    }
}
