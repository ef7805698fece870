//! Morphogenesis - Gray-Scott reaction-diffusion grown from a silhouette.
//!
//! Two chemical fields (substrate A and pigment B) evolve on a toroidal grid.
//! The initial pigment is placed inside a rasterized vector outline, so the
//! emerging Turing pattern first grows the shape and then spreads. Pointer
//! input drops pigment, and the explore mode sweeps the feed and kill rates.
//!
//! # Architecture
//!
//! - `schema`: Configuration, runtime parameters and silhouette paths
//! - `compute`: Mask rasterization, grid state, seeding and integration
//! - `interaction`: Input translation, command queue and dosing
//! - `render`: Palette, upscaling and drawing surfaces
//! - `simulation`: Frame loop and lifecycle
//!
//! # Example
//!
//! ```rust,no_run
//! use rd_morphogenesis::{
//!     render::BufferSurface,
//!     schema::SimulationConfig,
//!     simulation::Simulation,
//! };
//!
//! let mut surface = BufferSurface::new(512, 512);
//! let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
//! sim.init(&surface);
//! sim.start(&surface).unwrap();
//!
//! for frame in 0..100 {
//!     sim.tick(frame as f64 * 16.0, &mut surface);
//! }
//!
//! println!("{:?}", sim.stats());
//! ```

pub mod compute;
pub mod interaction;
pub mod render;
pub mod schema;
pub mod simulation;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{FieldStats, GridState, ShapeMask, ShapeMaskBuilder};
pub use render::{BufferSurface, Surface};
pub use schema::{SimulationConfig, SimulationParams};
pub use simulation::{Lifecycle, Simulation};
