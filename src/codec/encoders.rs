//! Image writers backed by the `image` crate's encoders.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::codec::writer::ImageWriter;
use crate::filter_engine::buffer::PixelBuffer;
use crate::filter_engine::common::{EngineError, Result};

fn color_type(channels: usize) -> Result<ExtendedColorType> {
    match channels {
        1 => Ok(ExtendedColorType::L8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        other => Err(EngineError::UnsupportedChannels(other)),
    }
}

pub struct PngWriter;

impl ImageWriter for PngWriter {
    fn write_image(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()> {
        PngEncoder::new(output)
            .write_image(
                image.bytes(),
                image.width() as u32,
                image.height() as u32,
                color_type(image.channels())?,
            )
            .map_err(|e| EngineError::EncodeError(e.to_string()))
    }
}

pub struct JpegWriter {
    quality: u8,
}

impl JpegWriter {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl Default for JpegWriter {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

impl ImageWriter for JpegWriter {
    fn write_image(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()> {
        if image.channels() == 4 {
            return Err(EngineError::EncodeError(
                "jpeg cannot encode an alpha channel".into(),
            ));
        }
        JpegEncoder::new_with_quality(output, self.quality)
            .write_image(
                image.bytes(),
                image.width() as u32,
                image.height() as u32,
                color_type(image.channels())?,
            )
            .map_err(|e| EngineError::EncodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DynamicReader, ImageReader};

    fn gradient(width: usize, height: usize, channels: usize) -> PixelBuffer {
        let data = (0..width * height * channels)
            .map(|i| (i % 251) as u8)
            .collect();
        PixelBuffer::from_vec(width, height, channels, data).unwrap()
    }

    #[test]
    fn png_round_trips_losslessly() {
        for channels in [1, 3, 4] {
            let original = gradient(9, 7, channels);
            let mut encoded = Vec::new();
            PngWriter.write_image(&original, &mut encoded).unwrap();

            let decoded = DynamicReader.read_image(&encoded).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn jpeg_preserves_shape() {
        let original = gradient(16, 12, 3);
        let mut encoded = Vec::new();
        JpegWriter::default()
            .write_image(&original, &mut encoded)
            .unwrap();

        let decoded = DynamicReader.read_image(&encoded).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 12);
        assert_eq!(decoded.channels(), 3);
    }

    #[test]
    fn jpeg_rejects_alpha() {
        let original = gradient(4, 4, 4);
        let mut encoded = Vec::new();
        let err = JpegWriter::default()
            .write_image(&original, &mut encoded)
            .unwrap_err();
        assert!(matches!(err, EngineError::EncodeError(_)));
    }

    #[test]
    fn encoded_file_round_trips_through_disk() {
        let original = gradient(6, 5, 3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let mut file = std::fs::File::create(&path).unwrap();
        PngWriter.write_image(&original, &mut file).unwrap();
        drop(file);

        let data = std::fs::read(&path).unwrap();
        assert_eq!(DynamicReader.read_image(&data).unwrap(), original);
    }
}
