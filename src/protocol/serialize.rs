//! Serializable capability
//!
//! Tipe user menulis dirinya sendiri lewat handler yang sama, jadi object
//! bisa berisi primitive, string, list, atau object lain secara rekursif.
//! Tidak ada tag tipe di stream: urutan baca harus persis sama dengan urutan tulis.

use super::handler::ImgHandler;
use crate::error::Result;

/// Encode half of the capability. Object-safe, so `Box<dyn Encode>` works.
pub trait Encode {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()>;
}

/// Decode half: constructor type-level, tidak terikat ke instance yang ada.
pub trait Decode: Sized {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self>;
}

/// Tipe yang bisa ditulis dan dibaca kembali
pub trait ImgSerializable: Encode + Decode {}

impl<T: Encode + Decode> ImgSerializable for T {}

impl Encode for u8 {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_byte(*self)?;
        Ok(())
    }
}

impl Decode for u8 {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        handler.read_byte()
    }
}

impl Encode for i32 {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_i32(*self)?;
        Ok(())
    }
}

impl Decode for i32 {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        handler.read_i32()
    }
}

impl Encode for i64 {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_i64(*self)?;
        Ok(())
    }
}

impl Decode for i64 {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        handler.read_i64()
    }
}

impl Encode for str {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_string(self)?;
        Ok(())
    }
}

impl Encode for String {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_string(self)?;
        Ok(())
    }
}

impl Decode for String {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        handler.read_string()
    }
}

impl<T: Encode> Encode for [T] {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_list(self)?;
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_list(self)?;
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        handler.read_list()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        (**self).img_serialize(handler)
    }
}
