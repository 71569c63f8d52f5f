//! Pixelcodec - Typed Serialization into RGB Raster Channels
//!
//! Arsitektur:
//! - Cursor: offset byte monotonic, 3 byte per pixel, row-major
//! - Primitive codec: byte, i32, i64 big-endian two's-complement
//! - String/List codec: prefix panjang i32
//! - Object delegation: tipe user encode/decode dirinya lewat handler yang sama
//! - Dispatch: `Value` (write) dan `Descriptor` (read) untuk stream dinamis
//!
//! ```no_run
//! use pixelcodec::{ImgHandler, Result};
//!
//! fn roundtrip() -> Result<()> {
//!     let mut img = image::RgbImage::new(50, 50);
//!     let mut handler = ImgHandler::new(&mut img);
//!     handler.write_string("Gaming Town")?.write_i64(22)?.save_file("test.png")?;
//!
//!     let mut loaded = pixelcodec::core::load_png("test.png")?;
//!     let mut reader = ImgHandler::new(&mut loaded);
//!     assert_eq!(reader.read_string()?, "Gaming Town");
//!     assert_eq!(reader.read_i64()?, 22);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod protocol;

pub use crate::core::{Cursor, MmapSurface, Pixel, Surface};
pub use error::{Error, IntKind, Result};
pub use protocol::{Decode, Descriptor, Encode, HandlerConfig, ImgHandler, ImgSerializable, Value};
