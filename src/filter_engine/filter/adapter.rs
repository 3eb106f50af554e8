use crate::filter_engine::buffer::{Region, TileView};
use crate::filter_engine::common::{EngineError, Result};

/// A dimension-preserving transform over one tile.
///
/// Implementations must be safe to invoke concurrently from independent
/// workers; the only shared state is the read-only `FilterParams`.
pub trait TileFilter: Sync {
    fn apply(&self, tile: &TileView<'_>, params: &super::FilterParams) -> Result<Vec<u8>>;
}

/// Invoke `filter` on one region's pixels and enforce the shape contract.
///
/// Any error out of the filter, including a non-preserved output shape, is
/// reported as a `FilterFailure` stamped with the region's row range.
pub fn apply_checked(
    filter: &dyn TileFilter,
    region: Region,
    tile: &TileView<'_>,
    params: &super::FilterParams,
) -> Result<Vec<u8>> {
    let pixels = filter
        .apply(tile, params)
        .map_err(|err| region_failure(region, err))?;

    if pixels.len() != tile.pixels.len() {
        return Err(EngineError::FilterFailure {
            row_start: region.row_start,
            row_end: region.row_end,
            detail: format!(
                "output length {} does not match tile length {}",
                pixels.len(),
                tile.pixels.len()
            ),
        });
    }

    Ok(pixels)
}

fn region_failure(region: Region, err: EngineError) -> EngineError {
    let detail = match err {
        EngineError::FilterFailure { detail, .. } => detail,
        other => other.to_string(),
    };
    EngineError::FilterFailure {
        row_start: region.row_start,
        row_end: region.row_end,
        detail,
    }
}
