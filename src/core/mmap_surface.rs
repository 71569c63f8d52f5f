//! Memory-Mapped PPM Surface
//!
//! Raster disimpan sebagai binary PPM (`P6`, maxval 255) dan di-mmap langsung:
//! - Zero-copy pixel access: baca/tulis channel langsung ke page cache
//! - Kernel-managed paging: raster besar tidak perlu muat di heap
//! - Persistence: cukup `flush()`, file di disk selalu PPM yang valid

use memmap2::{MmapMut, MmapOptions};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::surface::{Pixel, Surface, CHANNELS};
use crate::error::{Error, Result};

const MAGIC: &[u8; 2] = b"P6";
const MAXVAL: u32 = 255;

/// Mmap-backed raster dalam format PPM
pub struct MmapSurface {
    mmap: MmapMut,
    path: PathBuf,
    width: u32,
    height: u32,
    /// Offset byte pertama raster (setelah header PPM)
    data_offset: usize,
}

impl MmapSurface {
    /// Membuat file PPM baru berisi raster hitam
    ///
    /// # Arguments
    /// * `path` - Path ke file; file lama akan di-truncate
    /// * `width`, `height` - Dimensi raster, keduanya harus > 0
    pub fn create<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(malformed("surface dimensions must be non-zero"));
        }

        let path = path.as_ref();
        let header = format!("P6\n{} {}\n{}\n", width, height, MAXVAL);
        let raster_len = width as usize * height as usize * CHANNELS;
        let total_size = header.len() + raster_len;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        // File baru di-extend dengan nol: raster awal hitam
        file.set_len(total_size as u64)?;

        // SAFETY: File dibuka read/write dan hanya dipakai lewat mapping ini
        let mut mmap = unsafe { MmapOptions::new().len(total_size).map_mut(&file)? };
        mmap[..header.len()].copy_from_slice(header.as_bytes());

        debug!(path = %path.display(), width, height, "created mmap surface");

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            width,
            height,
            data_offset: header.len(),
        })
    }

    /// Membuka file PPM yang sudah ada
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        // SAFETY: File dibuka read/write dan hanya dipakai lewat mapping ini
        let mmap = unsafe { MmapOptions::new().map_mut(&file)? };

        let (width, height, data_offset) = parse_header(&mmap)?;
        let raster_len = width as usize * height as usize * CHANNELS;
        if mmap.len() < data_offset + raster_len {
            return Err(malformed("raster is shorter than the header claims"));
        }

        debug!(path = %path.display(), width, height, "opened mmap surface");

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            width,
            height,
            data_offset,
        })
    }

    /// Sync perubahan ke disk
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    /// Path file backing
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        self.data_offset + (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

impl Surface for MmapSurface {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        let i = self.index(x, y);
        [self.mmap[i], self.mmap[i + 1], self.mmap[i + 2]]
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let i = self.index(x, y);
        self.mmap[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    /// Flush mapping; jika `path` bukan file backing, salin seluruh PPM ke `path`.
    fn save(&self, path: &Path) -> Result<()> {
        self.flush()?;

        let same_file = match (fs::canonicalize(path), fs::canonicalize(&self.path)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            fs::write(path, &self.mmap[..])?;
        }

        debug!(path = %path.display(), copied = !same_file, "saved mmap surface");
        Ok(())
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedHeader(reason.to_string())
}

/// Parse header `P6 <width> <height> <maxval>` dan kembalikan offset raster.
///
/// Whitespace dan komentar `#` boleh muncul di antara field; setelah maxval
/// harus ada tepat satu whitespace sebelum raster dimulai.
fn parse_header(buf: &[u8]) -> Result<(u32, u32, usize)> {
    if !buf.starts_with(MAGIC) {
        return Err(malformed("missing P6 magic"));
    }

    let mut pos = MAGIC.len();
    let mut fields = [0u32; 3];

    for field in fields.iter_mut() {
        loop {
            match buf.get(pos) {
                Some(b'#') => {
                    while let Some(&c) = buf.get(pos) {
                        pos += 1;
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                Some(c) if c.is_ascii_whitespace() => pos += 1,
                Some(_) => break,
                None => return Err(malformed("unexpected end of header")),
            }
        }

        let start = pos;
        while buf.get(pos).is_some_and(|c| c.is_ascii_digit()) {
            pos += 1;
        }
        if start == pos {
            return Err(malformed("expected a decimal header field"));
        }

        // Digit ASCII selalu valid UTF-8
        let text = std::str::from_utf8(&buf[start..pos])
            .map_err(|_| malformed("non-ascii header field"))?;
        *field = text
            .parse()
            .map_err(|_| malformed("header field overflows u32"))?;
    }

    match buf.get(pos) {
        Some(c) if c.is_ascii_whitespace() => pos += 1,
        _ => return Err(malformed("missing whitespace after maxval")),
    }

    let [width, height, maxval] = fields;
    if maxval != MAXVAL {
        return Err(malformed("only 8-bit channels (maxval 255) are supported"));
    }
    if width == 0 || height == 0 {
        return Err(malformed("surface dimensions must be non-zero"));
    }

    Ok((width, height, pos))
}
