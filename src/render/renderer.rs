//! Pigment-to-pixel rendering and display scaling.

use super::palette::{glow, shade};
use crate::compute::GridState;

/// RGBA8 image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    /// Reallocate only when the dimensions change.
    pub fn ensure_size(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0u8; width * height * 4];
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Renders the B field at grid resolution, then scales to the display.
pub struct Renderer {
    pulse_speed: f32,
    /// Grid-resolution image (reused each frame).
    cells: FrameBuffer,
    /// Display-resolution image (reused each frame).
    display: FrameBuffer,
}

impl Renderer {
    pub fn new(pulse_speed: f32) -> Self {
        Self {
            pulse_speed,
            cells: FrameBuffer::new(0, 0),
            display: FrameBuffer::new(0, 0),
        }
    }

    /// Color every cell of the current B buffer at wall-clock `time` seconds.
    pub fn render_cells(&mut self, grid: &GridState, time: f32) -> &FrameBuffer {
        self.cells.ensure_size(grid.width, grid.height);
        let glow = glow(time, self.pulse_speed);

        for (px, &b) in self
            .cells
            .pixels
            .chunks_exact_mut(4)
            .zip(grid.current.b.iter())
        {
            px.copy_from_slice(&shade(b, glow));
        }
        &self.cells
    }

    /// Render and upscale to `width`×`height` with nearest-neighbour sampling.
    pub fn render(&mut self, grid: &GridState, time: f32, width: usize, height: usize) -> &FrameBuffer {
        self.render_cells(grid, time);
        self.display.ensure_size(width, height);
        scale_nearest(&self.cells, &mut self.display);
        &self.display
    }

    /// Last grid-resolution image.
    pub fn cells(&self) -> &FrameBuffer {
        &self.cells
    }
}

/// Nearest-neighbour resample of `src` into `dst` (dimensions taken from `dst`).
pub fn scale_nearest(src: &FrameBuffer, dst: &mut FrameBuffer) {
    if dst.width == 0 || dst.height == 0 {
        return;
    }
    if src.width == 0 || src.height == 0 {
        dst.pixels.fill(0);
        return;
    }
    if src.width == dst.width && src.height == dst.height {
        dst.pixels.copy_from_slice(&src.pixels);
        return;
    }

    let columns: Vec<usize> = (0..dst.width)
        .map(|x| (x * src.width / dst.width).min(src.width - 1))
        .collect();

    for (y, row) in dst.pixels.chunks_exact_mut(dst.width * 4).enumerate() {
        let sy = (y * src.height / dst.height).min(src.height - 1);
        let src_row = &src.pixels[sy * src.width * 4..(sy + 1) * src.width * 4];
        for (px, &sx) in row.chunks_exact_mut(4).zip(&columns) {
            px.copy_from_slice(&src_row[sx * 4..sx * 4 + 4]);
        }
    }
}
