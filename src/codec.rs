//! Image decode/encode collaborators
//!
//! The filter engine only consumes and produces `PixelBuffer`s; these
//! traits are the seam to the codecs that turn files into buffers and
//! back.

mod dynamic_reader;
mod encoders;
mod reader;
mod writer;

pub use dynamic_reader::DynamicReader;
pub use encoders::{JpegWriter, PngWriter};
pub use reader::ImageReader;
pub use writer::ImageWriter;
