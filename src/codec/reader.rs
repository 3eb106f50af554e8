use crate::filter_engine::buffer::PixelBuffer;
use crate::filter_engine::common::Result;

pub trait ImageReader {
    fn read_image(&self, data: &[u8]) -> Result<PixelBuffer>;
}
