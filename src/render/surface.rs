//! Drawing targets and the informational overlay.

use super::FrameBuffer;
use crate::schema::SimulationParams;

pub const OVERLAY_HINT: &str = "Click: drop chemical | R: reset | Shift+Move: explore params";

/// Display-only text drawn over the pattern. Never parsed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub status: String,
    pub hint: &'static str,
}

impl Overlay {
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            status: format!(
                "Gray-Scott Reaction-Diffusion | f={:.3} k={:.3}",
                params.feed, params.kill
            ),
            hint: OVERLAY_HINT,
        }
    }
}

/// A drawing target bound by the host.
pub trait Surface {
    /// Display size in pixels.
    fn size(&self) -> (usize, usize);

    /// Draw a frame already scaled to [`Surface::size`].
    fn present(&mut self, frame: &FrameBuffer);

    fn draw_overlay(&mut self, overlay: &Overlay);
}

/// In-memory surface keeping the last presented frame and overlay.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    width: usize,
    height: usize,
    frame: FrameBuffer,
    overlay: Option<Overlay>,
    frames_presented: u64,
}

impl BufferSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame: FrameBuffer::new(width, height),
            overlay: None,
            frames_presented: 0,
        }
    }

    /// Change the display size; takes effect on the next frame.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for BufferSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &FrameBuffer) {
        self.frame.ensure_size(frame.width, frame.height);
        self.frame.pixels.copy_from_slice(&frame.pixels);
        self.frames_presented += 1;
    }

    fn draw_overlay(&mut self, overlay: &Overlay) {
        match &mut self.overlay {
            Some(current) if current == overlay => {}
            slot => *slot = Some(overlay.clone()),
        }
    }
}
