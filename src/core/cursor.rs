//! Byte cursor over raster channels
//!
//! Stream linear di atas storage 2D: offset byte B dipetakan ke
//! `(x, y, channel)` dengan urutan row-major, x paling cepat berubah.
//! Tiga byte per pixel, tidak ada wraparound.

use super::surface::CHANNELS;
use crate::error::{Error, Result};

/// Lokasi satu channel byte di raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    /// 0 = r, 1 = g, 2 = b
    pub channel: usize,
}

/// Monotonic byte offset dengan batas kapasitas
#[derive(Debug, Clone)]
pub struct Cursor {
    offset: usize,
    width: u32,
    capacity: usize,
}

impl Cursor {
    /// Cursor baru di offset 0 untuk raster `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            offset: 0,
            width,
            capacity: width as usize * height as usize * CHANNELS,
        }
    }

    /// Reserve `n` byte. Returns offset awal reservasi.
    ///
    /// Gagal dengan `OutOfSpace` jika `offset + n` melewati kapasitas;
    /// dalam kasus itu offset tidak berubah.
    #[inline(always)]
    pub fn advance(&mut self, n: usize) -> Result<usize> {
        let start = self.offset;
        self.ensure(n)?;
        self.offset = start + n;
        Ok(start)
    }

    /// Cek `n` byte masih muat tanpa memindahkan offset
    #[inline(always)]
    pub fn ensure(&self, n: usize) -> Result<()> {
        match self.offset.checked_add(n) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(Error::OutOfSpace {
                offset: self.offset,
                requested: n,
                capacity: self.capacity,
            }),
        }
    }

    /// Map offset ke koordinat pixel dan channel
    #[inline(always)]
    pub fn locate(&self, offset: usize) -> Position {
        let pixel_index = offset / CHANNELS;
        let width = self.width as usize;
        Position {
            x: (pixel_index % width) as u32,
            y: (pixel_index / width) as u32,
            channel: offset % CHANNELS,
        }
    }

    /// Offset byte berikutnya
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sisa byte yang masih bisa ditulis/dibaca
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }
}
