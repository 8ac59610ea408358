//! Strip planning and the staging buffer
//!
//! A frame goes to the panel as a sequence of full-width horizontal strips.
//! Each strip is converted into one small staging buffer that is allocated
//! once per framebuffer and reused for every strip, which keeps both the
//! DMA-capable allocation and the time spent blocked on one transfer small.

use alloc::vec::Vec;

use crate::pixel::{convert_row, WireFormat};

/// Allocation failure for a backend-owned buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfMemory;

/// A horizontal slice of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Strip {
    /// First row
    pub y: u16,
    /// Number of rows (at least 1)
    pub rows: u16,
}

impl Strip {
    /// Exclusive end row
    pub const fn end(&self) -> u16 {
        self.y + self.rows
    }
}

/// Lazy sequence of strips covering a row range
///
/// Strips come out in increasing row order, never overlap, and only the
/// last one may be shorter than the maximum.
#[derive(Debug, Clone)]
pub struct StripPlan {
    next: u16,
    end: u16,
    max_rows: u16,
}

impl StripPlan {
    /// Plan strips covering `[0, height)`
    pub fn new(height: u16, max_rows: u16) -> Self {
        Self::over_rows(0, height, max_rows)
    }

    /// Plan strips covering `[start, end)`
    ///
    /// A `max_rows` of zero is treated as one row per strip.
    pub fn over_rows(start: u16, end: u16, max_rows: u16) -> Self {
        Self {
            next: start.min(end),
            end,
            max_rows: max_rows.max(1),
        }
    }
}

impl Iterator for StripPlan {
    type Item = Strip;

    fn next(&mut self) -> Option<Strip> {
        if self.next >= self.end {
            return None;
        }

        let rows = self.max_rows.min(self.end - self.next);
        let strip = Strip { y: self.next, rows };
        self.next += rows;
        Some(strip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = strip_count(self.end - self.next, self.max_rows);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StripPlan {}

/// Number of strips needed for `height` rows (`ceil(height / max_rows)`)
pub fn strip_count(height: u16, max_rows: u16) -> usize {
    let max_rows = max_rows.max(1) as usize;
    (height as usize).div_ceil(max_rows)
}

/// Fixed-size scratch buffer holding one converted strip
///
/// Sized for `width * max_rows` pixels at allocation and never resized.
#[derive(Debug)]
pub struct StagingBuffer {
    pixels: Vec<u16>,
    width: u16,
    max_rows: u16,
}

impl StagingBuffer {
    /// Allocate a buffer for strips of `width` pixels and up to `max_rows` rows
    pub fn allocate(width: u16, max_rows: u16) -> Result<Self, OutOfMemory> {
        let len = width as usize * max_rows as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| OutOfMemory)?;
        pixels.resize(len, 0);

        Ok(Self {
            pixels,
            width,
            max_rows,
        })
    }

    /// Capacity in pixels
    pub fn capacity_px(&self) -> usize {
        self.pixels.len()
    }

    /// Capacity in bytes
    pub fn capacity_bytes(&self) -> usize {
        self.pixels.len() * core::mem::size_of::<u16>()
    }

    /// Strip width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Tallest strip that fits
    pub fn max_rows(&self) -> u16 {
        self.max_rows
    }

    /// Convert one source row into row `index` of the staged strip
    ///
    /// Rows at or beyond `max_rows` are ignored; the buffer never grows.
    pub fn fill_row(&mut self, index: u16, src: &[u16], format: WireFormat) {
        if index >= self.max_rows {
            return;
        }
        let width = self.width as usize;
        let start = index as usize * width;
        let src = &src[..src.len().min(width)];
        convert_row(src, &mut self.pixels[start..start + width], format);
    }

    /// Convert every row of `strip` from a row-major `source` picture
    ///
    /// `stride` is the source row length in pixels. Returns the converted
    /// strip, ready for the panel.
    pub fn fill_strip(&mut self, strip: Strip, source: &[u16], stride: usize, format: WireFormat) -> &[u16] {
        let rows = strip.rows.min(self.max_rows);
        for index in 0..rows {
            let start = (strip.y + index) as usize * stride;
            let row = source.get(start..).unwrap_or(&[]);
            self.fill_row(index, row, format);
        }
        self.strip_pixels(rows)
    }

    /// Converted pixels of a strip with `rows` rows
    pub fn strip_pixels(&self, rows: u16) -> &[u16] {
        let rows = rows.min(self.max_rows) as usize;
        &self.pixels[..rows * self.width as usize]
    }
}
