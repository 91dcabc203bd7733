//! Initial-state scene loading
//!
//! Scenes are byte blobs of length `W*H` holding one kind id per cell in
//! top-left-origin row-major order. The grid's `y = 0` is at the bottom, so
//! rows flip vertically on load. The whole blob is validated before any
//! cell is committed.

use powderbox_particles::{Cell, KindId, try_get};

use super::grid::Grid;
use crate::error::{Error, Result};

/// Load a scene blob into the grid, replacing every cell.
pub fn load_blob(grid: &mut Grid, blob: &[u8]) -> Result<()> {
    let (width, height) = (grid.width(), grid.height());
    if blob.len() != width * height {
        return Err(Error::BlobSize {
            got: blob.len(),
            expected: width * height,
            width,
            height,
        });
    }

    let mut cells = Vec::with_capacity(blob.len());
    for (offset, &id) in blob.iter().enumerate() {
        let kind = try_get(id).ok_or(Error::UnknownKind { id, offset })?;
        // A scene has no way to express what fire is burning; oil is the
        // default fuel
        cells.push(if kind.id == KindId::FIRE {
            Cell::fire(KindId::OIL)
        } else {
            Cell::new(kind.id)
        });
    }

    for row in 0..height {
        for col in 0..width {
            let y = (height - 1 - row) as i64;
            if let Some(cell) = grid.get_mut(col as i64, y) {
                *cell = cells[row * width + col];
            }
        }
    }
    log::info!("loaded {}x{} scene blob", width, height);
    Ok(())
}
