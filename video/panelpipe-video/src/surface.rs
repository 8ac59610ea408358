//! Pixel surface the rendering library draws into

use alloc::vec::Vec;

use panelpipe_core::strip::OutOfMemory;
use panelpipe_core::{Rect, Rgb565};

/// Surface pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceFormat {
    /// 16-bit 5-6-5, host byte order
    #[default]
    Rgb565,
}

impl SurfaceFormat {
    /// Bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            SurfaceFormat::Rgb565 => 2,
        }
    }
}

/// Contiguous, row-major RGB565 pixel buffer
///
/// Owned by the windowing layer; the backend only borrows it while an
/// update runs.
#[derive(Debug)]
pub struct Surface {
    pixels: Vec<u16>,
    width: u16,
    height: u16,
}

impl Surface {
    /// Allocate a black surface
    pub fn allocate(width: u16, height: u16) -> Result<Self, OutOfMemory> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| OutOfMemory)?;
        pixels.resize(len, 0);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixel format tag
    pub fn format(&self) -> SurfaceFormat {
        SurfaceFormat::Rgb565
    }

    /// Row stride in bytes
    pub fn pitch(&self) -> usize {
        self.width as usize * self.format().bytes_per_pixel()
    }

    /// Row stride in pixels
    pub fn stride(&self) -> usize {
        self.width as usize
    }

    /// Surface bounds
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    /// One row, or `None` past the bottom edge
    pub fn row(&self, y: u16) -> Option<&[u16]> {
        let start = y as usize * self.stride();
        self.pixels.get(start..start + self.stride())
    }

    /// One row, mutable
    pub fn row_mut(&mut self, y: u16) -> Option<&mut [u16]> {
        let start = y as usize * self.stride();
        let end = start + self.stride();
        self.pixels.get_mut(start..end)
    }

    /// Set one pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565) {
        if x < self.width {
            if let Some(row) = self.row_mut(y) {
                row[x as usize] = color.bits();
            }
        }
    }

    /// Fill the whole surface
    pub fn fill(&mut self, color: Rgb565) {
        self.pixels.fill(color.bits());
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb565) {
        let x0 = rect.x.min(self.width) as usize;
        let x1 = (rect.right().min(self.width as u32)) as usize;
        let y1 = rect.bottom().min(self.height as u32) as u16;
        for y in rect.y.min(self.height)..y1 {
            if let Some(row) = self.row_mut(y) {
                row[x0..x1].fill(color.bits());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        let surface = Surface::allocate(320, 240).unwrap();
        assert_eq!(surface.pitch(), 640);
        assert_eq!(surface.stride(), 320);
        assert_eq!(surface.pixels().len(), 76_800);
        assert_eq!(surface.format(), SurfaceFormat::Rgb565);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::allocate(4, 4).unwrap();
        surface.fill_rect(Rect::new(2, 2, 10, 10), Rgb565::WHITE);

        assert_eq!(surface.row(1).unwrap(), &[0, 0, 0, 0]);
        assert_eq!(surface.row(3).unwrap(), &[0, 0, 0xFFFF, 0xFFFF]);
        assert!(surface.row(4).is_none());
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut surface = Surface::allocate(2, 2).unwrap();
        surface.set_pixel(5, 0, Rgb565::RED);
        surface.set_pixel(0, 5, Rgb565::RED);
        surface.set_pixel(1, 1, Rgb565::RED);
        assert_eq!(surface.pixels(), &[0, 0, 0, Rgb565::RED.bits()]);
    }
}
