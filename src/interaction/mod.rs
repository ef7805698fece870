//! Interaction module - Input translation, command queue and dosing.

mod command;
mod controller;

pub use command::*;
pub use controller::*;
