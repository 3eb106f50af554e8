//! Tile reassembly
//!
//! Concatenates filtered tiles back into one buffer, in region order,
//! validating shape consistency first. The shared-arena transport never
//! reaches this copy path; its arena already is the output buffer.

use crate::filter_engine::buffer::PixelBuffer;
use crate::filter_engine::common::{EngineError, Result};
use crate::filter_engine::transport::FilteredTile;

/// Combine `tiles` into a freshly allocated buffer.
///
/// Fails with `IncompleteResult` when fewer tiles arrive than regions were
/// dispatched (a cancelled or failed run must not be reassembled), and
/// with `ShapeMismatch` when any tile disagrees with the expected width or
/// channel depth, breaks row contiguity, or carries the wrong byte count.
pub fn combine(
    tiles: &[FilteredTile],
    width: usize,
    channels: usize,
    expected_regions: usize,
) -> Result<PixelBuffer> {
    if tiles.len() < expected_regions {
        return Err(EngineError::IncompleteResult {
            received: tiles.len(),
            expected: expected_regions,
        });
    }

    let mut next_row = 0;
    for tile in tiles {
        let region = &tile.region;
        if region.width != width || region.channels != channels {
            return Err(EngineError::ShapeMismatch(format!(
                "tile rows {}..{} has shape {}x{}, expected {}x{}",
                region.row_start, region.row_end, region.width, region.channels, width, channels
            )));
        }
        if region.row_start != next_row {
            return Err(EngineError::ShapeMismatch(format!(
                "tile rows {}..{} break contiguity at row {}",
                region.row_start, region.row_end, next_row
            )));
        }
        if tile.pixels.len() != region.byte_len() {
            return Err(EngineError::ShapeMismatch(format!(
                "tile rows {}..{} carries {} bytes, expected {}",
                region.row_start,
                region.row_end,
                tile.pixels.len(),
                region.byte_len()
            )));
        }
        next_row = region.row_end;
    }

    let height = next_row;
    let mut data = vec![0; width * height * channels];
    for tile in tiles {
        data[tile.region.byte_range()].copy_from_slice(&tile.pixels);
    }

    PixelBuffer::from_vec(width, height, channels, data)
}
