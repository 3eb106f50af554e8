//! Gaussian smoothing backed by the `image` crate.
//!
//! The numerical kernel itself lives in `image::imageops`; this type only
//! moves tile bytes in and out of the crate's typed buffers.

use image::{GrayImage, RgbImage, RgbaImage, imageops};

use crate::filter_engine::buffer::TileView;
use crate::filter_engine::common::{EngineError, Result};
use crate::filter_engine::filter::{FilterParams, TileFilter};

pub struct GaussianSmoother;

impl TileFilter for GaussianSmoother {
    fn apply(&self, tile: &TileView<'_>, params: &FilterParams) -> Result<Vec<u8>> {
        if params.sigma <= 0.0 {
            return Ok(tile.pixels.to_vec());
        }

        let width = tile.width as u32;
        let height = tile.height as u32;

        let smoothed = match tile.channels {
            1 => {
                let img = GrayImage::from_raw(width, height, tile.pixels.to_vec())
                    .ok_or_else(|| malformed_tile(tile))?;
                imageops::blur(&img, params.sigma).into_raw()
            }
            3 => {
                let img = RgbImage::from_raw(width, height, tile.pixels.to_vec())
                    .ok_or_else(|| malformed_tile(tile))?;
                imageops::blur(&img, params.sigma).into_raw()
            }
            4 => {
                let img = RgbaImage::from_raw(width, height, tile.pixels.to_vec())
                    .ok_or_else(|| malformed_tile(tile))?;
                imageops::blur(&img, params.sigma).into_raw()
            }
            other => return Err(EngineError::UnsupportedChannels(other)),
        };

        Ok(smoothed)
    }
}

fn malformed_tile(tile: &TileView<'_>) -> EngineError {
    EngineError::ShapeMismatch(format!(
        "{} bytes do not form a {}x{}x{} tile",
        tile.pixels.len(),
        tile.width,
        tile.height,
        tile.channels
    ))
}
