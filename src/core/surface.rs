//! Pixel-addressable raster capability
//!
//! Codec hanya butuh empat operasi per-pixel plus satu hook untuk persistensi.
//! Semua format dengan 3 channel 8-bit bisa dipakai selama mengimplementasi `Surface`.

use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::error::Result;

/// Satu pixel: (r, g, b)
pub type Pixel = [u8; 3];

/// Channel per pixel. Alpha dan bit depth lain tidak didukung.
pub const CHANNELS: usize = 3;

/// Raster yang dipinjam oleh handler.
///
/// Koordinat selalu di dalam `0..width()` x `0..height()`; pemanggil (cursor)
/// menjamin batas sebelum memanggil `get_pixel`/`set_pixel`.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn get_pixel(&self, x: u32, y: u32) -> Pixel;

    fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel);

    /// Persist raster ke `path` dengan format milik surface itu sendiri.
    fn save(&self, path: &Path) -> Result<()>;

    /// Jumlah channel byte yang bisa dipakai: width * height * 3
    #[inline(always)]
    fn capacity(&self) -> usize {
        self.width() as usize * self.height() as usize * CHANNELS
    }
}

impl Surface for RgbImage {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline(always)]
    fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        image::ImageBuffer::get_pixel(self, x, y).0
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        self.put_pixel(x, y, image::Rgb(pixel));
    }

    fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), width = self.width(), height = self.height(), "saving image surface");
        image::ImageBuffer::save(self, path)?;
        Ok(())
    }
}

/// Load gambar dari disk dan konversi ke RGB8.
///
/// Gambar dengan alpha atau 16-bit dikonversi; channel ekstra dibuang.
pub fn load_png<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path)?.into_rgb8();
    debug!(path = %path.display(), width = img.width(), height = img.height(), "loaded image surface");
    Ok(img)
}
