//! Image reader backed by the `image` crate's format detection.
//!
//! Decodes any enabled format (PNG, JPEG) from a byte stream. Grayscale,
//! RGB and RGBA stay at their native channel depth; anything else is
//! normalized to RGB.

use image::DynamicImage;
use tracing::debug;

use crate::codec::reader::ImageReader;
use crate::filter_engine::buffer::PixelBuffer;
use crate::filter_engine::common::{EngineError, Result};

pub struct DynamicReader;

impl ImageReader for DynamicReader {
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer> {
        let decoded =
            image::load_from_memory(data).map_err(|e| EngineError::DecodeError(e.to_string()))?;

        let buffer = match decoded {
            DynamicImage::ImageLuma8(img) => {
                let (width, height) = img.dimensions();
                PixelBuffer::from_vec(width as usize, height as usize, 1, img.into_raw())?
            }
            DynamicImage::ImageRgb8(img) => {
                let (width, height) = img.dimensions();
                PixelBuffer::from_vec(width as usize, height as usize, 3, img.into_raw())?
            }
            DynamicImage::ImageRgba8(img) => {
                let (width, height) = img.dimensions();
                PixelBuffer::from_vec(width as usize, height as usize, 4, img.into_raw())?
            }
            other => {
                let img = other.into_rgb8();
                let (width, height) = img.dimensions();
                PixelBuffer::from_vec(width as usize, height as usize, 3, img.into_raw())?
            }
        };

        debug!(
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channels(),
            "decoded image"
        );
        Ok(buffer)
    }
}
