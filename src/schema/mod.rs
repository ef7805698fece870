//! Schema module - Configuration, runtime parameters and silhouettes.

mod config;
mod params;
mod silhouette;

pub use config::*;
pub use params::*;
pub use silhouette::*;
