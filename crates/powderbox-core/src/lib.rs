//! powderbox-core - falling-sand world coupled to a rigid-body solver
//!
//! The core runs a dense particle grid through chunk-parallel swap rules,
//! projects the solid cells into a byte mask, extracts and simplifies
//! boundary contours, and feeds triangulated collision geometry into an
//! abstract rigid-body solver every tick.

pub mod config;
pub mod contour;
pub mod error;
pub mod physics;
pub mod rng;
pub mod sim;
pub mod world;

pub use config::SimConfig;
pub use error::{Error, Result};
pub use rng::{NoiseSource, SeededNoise};
pub use sim::Simulation;
pub use world::World;
