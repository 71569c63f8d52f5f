//! Core module: Raster surface dan byte cursor
//!
//! Prinsip desain:
//! - Byte-level addressing: 3 byte per pixel, codec di atasnya cukup melihat stream flat
//! - Borrowed surface: handler meminjam raster, tidak memilikinya
//! - No wraparound: melewati kapasitas selalu error

mod cursor;
mod mmap_surface;
mod surface;

pub use cursor::{Cursor, Position};
pub use mmap_surface::MmapSurface;
pub use surface::{load_png, Pixel, Surface, CHANNELS};
