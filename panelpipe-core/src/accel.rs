//! Rotate/scale accelerator path
//!
//! Boards with a pixel-processing unit can rotate and upscale the content
//! region of the surface in hardware. The result lands in a dedicated,
//! 64-byte aligned output buffer which is then sent to the panel in one
//! transfer, centered on the physical panel.
//!
//! Centering clamps negative offsets to zero. Output larger than the panel
//! therefore starts at the panel edge and runs past the far side; this is
//! not a proper letterbox.

use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};
use panelpipe_hal::{AccelError, DrawArea, RotateScaleJob, RotateScaleUnit};

use crate::config::{Rect, Rotation};
use crate::pixel::WireFormat;
use crate::strip::OutOfMemory;

/// Byte alignment the accelerator requires for its output buffer
pub const ACCEL_ALIGN: usize = 64;

/// Pixels per aligned block
const BLOCK_PIXELS: usize = ACCEL_ALIGN / core::mem::size_of::<u16>();

/// One alignment unit of the output buffer
#[repr(C, align(64))]
#[derive(Clone, Copy, Pod, Zeroable)]
struct AlignedBlock([u16; BLOCK_PIXELS]);

/// Accelerator output dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputGeometry {
    pub width: u16,
    pub height: u16,
}

impl OutputGeometry {
    /// Output size for an input block after rotation and integer scaling
    ///
    /// Returns `None` if the scaled size does not fit in 16 bits.
    pub fn compute(input_width: u16, input_height: u16, rotation: Rotation, scale: u8) -> Option<Self> {
        let (width, height) = if rotation.swaps_axes() {
            (input_height, input_width)
        } else {
            (input_width, input_height)
        };

        Some(Self {
            width: width.checked_mul(scale as u16)?,
            height: height.checked_mul(scale as u16)?,
        })
    }

    /// Number of output pixels
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Output size in bytes, rounded up to the accelerator alignment
    pub const fn aligned_bytes(&self) -> usize {
        let raw = self.pixel_count() * core::mem::size_of::<u16>();
        (raw + ACCEL_ALIGN - 1) & !(ACCEL_ALIGN - 1)
    }
}

/// Top-left position that centers `output` on `panel`
///
/// Each axis is `max(0, (panel - output) / 2)`.
pub fn center_offset(panel: (u16, u16), output: OutputGeometry) -> (u16, u16) {
    let axis = |panel: u16, out: u16| ((panel as i32 - out as i32) / 2).max(0) as u16;
    (axis(panel.0, output.width), axis(panel.1, output.height))
}

/// Aligned output buffer for the accelerator
///
/// Allocated on first use and reallocated only when the output geometry
/// changes.
#[derive(Default)]
pub struct AcceleratorBuffer {
    blocks: Vec<AlignedBlock>,
    geometry: Option<OutputGeometry>,
}

impl AcceleratorBuffer {
    /// Create an empty, unallocated buffer
    pub const fn new() -> Self {
        Self {
            blocks: Vec::new(),
            geometry: None,
        }
    }

    /// Make the buffer fit `geometry`
    ///
    /// Returns `Ok(true)` if memory was (re)allocated.
    pub fn ensure(&mut self, geometry: OutputGeometry) -> Result<bool, OutOfMemory> {
        if self.geometry == Some(geometry) {
            return Ok(false);
        }

        let count = geometry.aligned_bytes() / ACCEL_ALIGN;
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(count).map_err(|_| OutOfMemory)?;
        blocks.resize(count, AlignedBlock::zeroed());

        self.blocks = blocks;
        self.geometry = Some(geometry);
        Ok(true)
    }

    /// Geometry the buffer is currently sized for
    pub fn geometry(&self) -> Option<OutputGeometry> {
        self.geometry
    }

    /// Allocated size in bytes (a multiple of the alignment)
    pub fn len_bytes(&self) -> usize {
        self.blocks.len() * ACCEL_ALIGN
    }

    /// Output pixels
    pub fn as_slice(&self) -> &[u16] {
        let len = self.geometry.map_or(0, |g| g.pixel_count());
        &bytemuck::cast_slice::<AlignedBlock, u16>(self.blocks.as_slice())[..len]
    }

    /// Output pixels, mutable
    pub fn as_mut_slice(&mut self) -> &mut [u16] {
        let len = self.geometry.map_or(0, |g| g.pixel_count());
        &mut bytemuck::cast_slice_mut::<AlignedBlock, u16>(self.blocks.as_mut_slice())[..len]
    }

    /// Release the memory
    pub fn release(&mut self) {
        self.blocks = Vec::new();
        self.geometry = None;
    }
}

/// Why the accelerated path could not produce a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The unit rejected or failed the job
    Unit(AccelError),
    /// The output buffer could not be allocated
    OutOfMemory,
    /// Content region outside the surface, or output too large
    Geometry,
}

/// Source picture handed to the accelerator
#[derive(Debug, Clone, Copy)]
pub struct SourcePicture<'a> {
    /// Pixels, row-major
    pub pixels: &'a [u16],
    /// Row stride in pixels
    pub stride: u16,
    /// Picture height in rows
    pub height: u16,
    /// Visible width in pixels
    pub width: u16,
}

/// Accelerated frame ready for a single panel transfer
#[derive(Debug)]
pub struct AcceleratedFrame<'a> {
    pub area: DrawArea,
    pub pixels: &'a [u16],
}

/// Transform parameters applied to every accelerated frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    pub rotation: Rotation,
    pub scale: u8,
    /// Panel wire format; the unit performs the swaps
    pub format: WireFormat,
}

/// Accelerator unit plus its output buffer
pub struct AcceleratorPath<A> {
    unit: A,
    buffer: AcceleratorBuffer,
    failures: u32,
}

impl<A: RotateScaleUnit> AcceleratorPath<A> {
    /// Wrap an accelerator unit; no memory is allocated yet
    pub fn new(unit: A) -> Self {
        Self {
            unit,
            buffer: AcceleratorBuffer::new(),
            failures: 0,
        }
    }

    /// Rotate and scale `content` of `source`, centered on a `panel`-sized display
    pub fn render(
        &mut self,
        source: SourcePicture<'_>,
        content: Rect,
        transform: Transform,
        panel: (u16, u16),
    ) -> Result<AcceleratedFrame<'_>, RenderError> {
        let result = self.run(source, content, transform, panel);
        if result.is_err() {
            self.failures = self.failures.saturating_add(1);
        }
        let area = result?;

        Ok(AcceleratedFrame {
            area,
            pixels: self.buffer.as_slice(),
        })
    }

    fn run(
        &mut self,
        source: SourcePicture<'_>,
        content: Rect,
        transform: Transform,
        panel: (u16, u16),
    ) -> Result<DrawArea, RenderError> {
        if !Rect::with_size(source.width, source.height).contains(&content) || content.is_empty() {
            return Err(RenderError::Geometry);
        }

        let geometry = OutputGeometry::compute(
            content.width,
            content.height,
            transform.rotation,
            transform.scale,
        )
        .ok_or(RenderError::Geometry)?;

        if self.buffer.ensure(geometry).map_err(|_| RenderError::OutOfMemory)? {
            info!(
                "Accelerator buffer allocated: {}x{} ({} bytes aligned)",
                geometry.width,
                geometry.height,
                self.buffer.len_bytes()
            );
        }

        let job = RotateScaleJob {
            input: source.pixels,
            in_pic_width: source.stride,
            in_pic_height: source.height,
            block_x: content.x,
            block_y: content.y,
            block_width: content.width,
            block_height: content.height,
            output: self.buffer.as_mut_slice(),
            out_width: geometry.width,
            out_height: geometry.height,
            angle: transform.rotation,
            scale_x: transform.scale,
            scale_y: transform.scale,
            rgb_swap: transform.format.swaps_channels(),
            byte_swap: transform.format.big_endian(),
        };
        self.unit.rotate_scale(job).map_err(RenderError::Unit)?;

        let (x, y) = center_offset(panel, geometry);
        Ok(DrawArea::from_origin(x, y, geometry.width, geometry.height))
    }

    /// Output buffer
    pub fn buffer(&self) -> &AcceleratorBuffer {
        &self.buffer
    }

    /// Number of frames the accelerator failed to produce
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Free the output buffer
    pub fn release(&mut self) {
        self.buffer.release();
    }
}
