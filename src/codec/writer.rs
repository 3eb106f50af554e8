use std::io::Write;

use crate::filter_engine::buffer::PixelBuffer;
use crate::filter_engine::common::Result;

pub trait ImageWriter {
    fn write_image(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()>;
}
