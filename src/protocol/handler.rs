//! Raster Handler: Encoder + Decoder dalam satu cursor
//!
//! Semua operasi tulis/baca melewati satu `Cursor` di atas satu `Surface`
//! yang dipinjam. Wire format:
//! - byte: 1 byte raw
//! - i32/i64: big-endian two's-complement
//! - string: `[i32 byte-length][UTF-8 bytes]`
//! - list: `[i32 count][elements...]`
//! - object: sub-stream tanpa framing, ditulis oleh tipe itu sendiri

use std::path::Path;

use tracing::{debug, trace};

use super::serialize::{Decode, Encode};
use crate::core::{Cursor, Surface};
use crate::error::{Error, IntKind, Result};

/// Konfigurasi handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Lebar integer untuk tulis tanpa lebar eksplisit (`write_int`, `Value::Int`)
    pub default_int_width: IntKind,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_int_width: IntKind::I64,
        }
    }
}

/// Handler yang membaca dan menulis stream bertipe ke channel byte sebuah raster.
///
/// Semua `write_*` mengembalikan `&mut Self` supaya bisa di-chain dengan `?`.
/// Setelah error apa pun, posisi cursor tidak terdefinisi: buang handler-nya.
pub struct ImgHandler<'a> {
    surface: &'a mut dyn Surface,
    cursor: Cursor,
    config: HandlerConfig,
}

impl<'a> ImgHandler<'a> {
    /// Handler baru dengan cursor di offset 0
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        Self::with_config(surface, HandlerConfig::default())
    }

    pub fn with_config(surface: &'a mut dyn Surface, config: HandlerConfig) -> Self {
        let cursor = Cursor::new(surface.width(), surface.height());
        debug!(
            width = surface.width(),
            height = surface.height(),
            capacity = cursor.capacity(),
            default_int = %config.default_int_width,
            "created image handler"
        );
        Self {
            surface,
            cursor,
            config,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Offset byte berikutnya = total byte yang sudah ditulis/dibaca
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Persist surface lewat format milik surface itu sendiri
    pub fn save_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), bytes = self.offset(), "saving surface");
        self.surface.save(path)?;
        Ok(self)
    }

    // ---------------------------------------------------------------
    // Raw channel access
    // ---------------------------------------------------------------

    /// Read-modify-write satu channel
    #[inline(always)]
    fn put(&mut self, offset: usize, value: u8) {
        let pos = self.cursor.locate(offset);
        let mut pixel = self.surface.get_pixel(pos.x, pos.y);
        pixel[pos.channel] = value;
        self.surface.set_pixel(pos.x, pos.y, pixel);
    }

    #[inline(always)]
    fn get(&self, offset: usize) -> u8 {
        let pos = self.cursor.locate(offset);
        self.surface.get_pixel(pos.x, pos.y)[pos.channel]
    }

    /// Reserve seluruh panjang dulu: tidak ada tulisan parsial saat kapasitas kurang
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let start = self.cursor.advance(bytes.len())?;
        for (i, &b) in bytes.iter().enumerate() {
            self.put(start + i, b);
        }
        Ok(())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let start = self.cursor.advance(len)?;
        Ok((start..start + len).map(|offset| self.get(offset)).collect())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let start = self.cursor.advance(N)?;
        let mut out = [0u8; N];
        for (i, b) in out.iter_mut().enumerate() {
            *b = self.get(start + i);
        }
        Ok(out)
    }

    // ---------------------------------------------------------------
    // Write path
    // ---------------------------------------------------------------

    /// Tulis satu byte raw
    pub fn write_byte(&mut self, value: u8) -> Result<&mut Self> {
        trace!(kind = "byte", offset = self.offset(), value, "write");
        self.write_bytes(&[value])?;
        Ok(self)
    }

    /// Tulis integer 4 byte. Gagal dengan `Range` di luar [-2^31, 2^31-1].
    pub fn write_i32(&mut self, value: impl Into<i128>) -> Result<&mut Self> {
        let value = value.into();
        IntKind::I32.check(value)?;
        trace!(kind = "i32", offset = self.offset(), value = %value, "write");
        self.write_bytes(&(value as i32).to_be_bytes())?;
        Ok(self)
    }

    /// Tulis integer 8 byte. Gagal dengan `Range` di luar [-2^63, 2^63-1].
    pub fn write_i64(&mut self, value: impl Into<i128>) -> Result<&mut Self> {
        let value = value.into();
        IntKind::I64.check(value)?;
        trace!(kind = "i64", offset = self.offset(), value = %value, "write");
        self.write_bytes(&(value as i64).to_be_bytes())?;
        Ok(self)
    }

    /// Tulis integer dengan lebar tertentu, range dicek dulu
    pub fn write_int_as(&mut self, kind: IntKind, value: impl Into<i128>) -> Result<&mut Self> {
        let value = value.into();
        match kind {
            IntKind::Byte => {
                kind.check(value)?;
                self.write_byte(value as u8)
            }
            IntKind::I32 => self.write_i32(value),
            IntKind::I64 => self.write_i64(value),
        }
    }

    /// Convenience: tulis integer dengan lebar default (i64 kecuali dikonfigurasi lain).
    ///
    /// Pakai `write_i32`/`write_i64` jika lebar di stream penting bagi pembaca.
    pub fn write_int(&mut self, value: impl Into<i128>) -> Result<&mut Self> {
        self.write_int_as(self.config.default_int_width, value)
    }

    /// Tulis string: panjang UTF-8 (bukan jumlah karakter) sebagai i32, lalu byte-nya.
    ///
    /// Prefix dan isi di-reserve bersama, jadi string yang tidak muat tidak
    /// meninggalkan prefix yatim.
    pub fn write_string(&mut self, value: &str) -> Result<&mut Self> {
        self.cursor.ensure(IntKind::I32.width().saturating_add(value.len()))?;
        self.write_len(value.len())?;
        trace!(kind = "string", offset = self.offset(), len = value.len(), "write");
        self.write_bytes(value.as_bytes())?;
        Ok(self)
    }

    /// Delegasi ke logic encode milik value, tanpa framing
    pub fn write_object<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        value.img_serialize(self)?;
        Ok(self)
    }

    /// Tulis list homogen: count i32 lalu tiap elemen lewat codec tipenya
    pub fn write_list<T: Encode>(&mut self, items: &[T]) -> Result<&mut Self> {
        self.write_len(items.len())?;
        for item in items {
            item.img_serialize(self)?;
        }
        Ok(self)
    }

    /// Tulis value apa pun; codec dipilih dari tipe statis `T`
    pub fn write_next<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.write_object(value)
    }

    /// Length/count prefix
    pub(crate) fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| Error::Range {
            value: len as i128,
            kind: IntKind::I32,
        })?;
        self.write_i32(len)?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Read path
    // ---------------------------------------------------------------

    pub fn read_byte(&mut self) -> Result<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Baca integer dengan lebar default, dilebarkan ke i64
    pub fn read_int(&mut self) -> Result<i64> {
        match self.config.default_int_width {
            IntKind::Byte => self.read_byte().map(i64::from),
            IntKind::I32 => self.read_i32().map(i64::from),
            IntKind::I64 => self.read_i64(),
        }
    }

    /// Baca string; byte yang bukan UTF-8 valid menghasilkan `Error::Utf8`
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Panggil constructor type-level `T::img_deserialize`
    pub fn read_object<T: Decode>(&mut self) -> Result<T> {
        T::img_deserialize(self)
    }

    /// Baca list: count i32 lalu `count` elemen bertipe `T`
    pub fn read_list<T: Decode>(&mut self) -> Result<Vec<T>> {
        let len = self.read_len()?;
        // Count dari stream belum tentu jujur; jangan alokasi lebih dari sisa byte
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::img_deserialize(self)?);
        }
        Ok(items)
    }

    /// Baca value berikutnya; tipe `T` berperan sebagai type descriptor
    pub fn read_next<T: Decode>(&mut self) -> Result<T> {
        self.read_object()
    }

    pub(crate) fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| Error::InvalidLength { len })
    }
}
