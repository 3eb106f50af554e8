//! Horizontal band partitioning
//!
//! Splits a buffer's row range into contiguous, non-overlapping regions
//! whose union covers the full height. The last region absorbs the
//! remainder when the height is not evenly divisible.

use crate::filter_engine::buffer::{PixelBuffer, Region};
use crate::filter_engine::common::{EngineError, Result};

/// Partition `buffer` into `count` horizontal bands.
///
/// Fails with `InvalidPartitionCount` when `count` is zero or exceeds the
/// buffer height; a zero-height region is never produced.
pub fn tile(buffer: &PixelBuffer, count: usize) -> Result<Vec<Region>> {
    let height = buffer.height();
    if count == 0 || count > height {
        return Err(EngineError::InvalidPartitionCount { count, height });
    }

    let part_height = height / count;
    let regions = (0..count)
        .map(|index| {
            let row_start = index * part_height;
            let row_end = if index == count - 1 {
                height
            } else {
                row_start + part_height
            };
            Region {
                index,
                row_start,
                row_end,
                width: buffer.width(),
                channels: buffer.channels(),
            }
        })
        .collect();

    Ok(regions)
}
