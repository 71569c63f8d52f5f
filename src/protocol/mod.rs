//! Protocol Layer: Typed stream di atas channel byte raster
//!
//! Prinsip desain:
//! - Flat byte stream: codec tidak peduli batas pixel
//! - No type tags: pembaca menyuplai bentuk stream (tipe statis atau `Descriptor`)
//! - Recursive objects: tipe user menulis dirinya lewat handler yang sama

mod handler;
mod serialize;
mod value;

pub use handler::{HandlerConfig, ImgHandler};
pub use serialize::{Decode, Encode, ImgSerializable};
pub use value::{Descriptor, Object, ObjectType, Value};
