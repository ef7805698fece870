//! Compute module - Grid state, seeding and numerical integration.

mod field;
mod integrator;
mod mask;
mod seeding;

pub use field::*;
pub use integrator::{run, run_frame, step};
pub use mask::*;
pub use seeding::*;
