//! Solid mask projection
//!
//! Derives the byte grid of "is solid" bits consumed by the contour
//! extractor. Pure function of the grid; runs single-threaded after the
//! update waves so the contour pass reads a consistent mask.

use super::grid::Grid;

/// Fill `mask` with one byte per cell: 1 where the effective kind is solid.
/// For fire cells the burning kind decides, so a burning wall keeps its
/// collision geometry until it burns away.
pub fn project(grid: &Grid, mask: &mut Vec<u8>) {
    mask.resize(grid.width() * grid.height(), 0);
    for (slot, cell) in mask.iter_mut().zip(grid.cells()) {
        *slot = cell.effective_kind().solid as u8;
    }
}
