//! World state - grid, update engine, tick scheduling

mod ca_update;
mod grid;
mod ingest;
mod snapshot;
mod solid_mask;
mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use ca_update::{GAS_OFFSETS, LIQUID_OFFSETS, MOORE_NEIGHBOURS, POWDER_OFFSETS};
pub use grid::Grid;
pub use snapshot::{CellReadout, ReadoutFrame, Renderer};
pub use stats::{NoopStats, SimStats};
pub use world::{ScanOrder, World};
