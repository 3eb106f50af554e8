//! Pixel buffer module
//!
//! This module provides the in-memory image representation shared by every
//! stage of a run, plus the row-range views handed to workers.

pub mod types;

pub use types::{PixelBuffer, Region, TileView};
