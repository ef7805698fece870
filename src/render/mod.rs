//! Render module - Palette, frame buffers and drawing surfaces.

mod palette;
mod renderer;
mod surface;

pub use palette::*;
pub use renderer::*;
pub use surface::*;
