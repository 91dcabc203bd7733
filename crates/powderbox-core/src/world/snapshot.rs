//! Per-cell readout surface for renderers

use powderbox_particles::{KindId, get as kind};

use super::grid::Grid;
use crate::contour::Contour;

/// What a renderer needs to draw one cell
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellReadout {
    pub kind_id: u8,
    /// For fire, how much of the fuel's burn time has elapsed (0.0 - 1.0);
    /// zero for everything else
    pub lifetime_ratio: f32,
}

/// Reusable per-cell snapshot buffer, row-major like the grid
pub struct ReadoutFrame {
    width: usize,
    height: usize,
    pub cells: Vec<CellReadout>,
}

impl ReadoutFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellReadout::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&CellReadout> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub(crate) fn fill_from(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();
        self.cells.resize(self.width * self.height, CellReadout::default());

        for (slot, cell) in self.cells.iter_mut().zip(grid.cells()) {
            slot.kind_id = cell.kind;
            slot.lifetime_ratio = match (cell.kind, cell.secondary) {
                (KindId::FIRE, Some(secondary)) => {
                    let burn_time = kind(secondary).burn_time;
                    if burn_time > 0 {
                        (cell.lifetime as f32 / burn_time as f32).clamp(0.0, 1.0)
                    } else {
                        1.0
                    }
                }
                _ => 0.0,
            };
        }
    }
}

/// Optional consumer of per-tick readouts and debug contours
pub trait Renderer {
    fn present(&mut self, frame: &ReadoutFrame, contours: &[Contour]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use powderbox_particles::Cell;

    #[test]
    fn test_readout_kind_ids() {
        let mut grid = Grid::new(2, 1);
        *grid.get_mut(0, 0).unwrap() = Cell::new(KindId::SAND);

        let mut frame = ReadoutFrame::new(2, 1);
        frame.fill_from(&grid);

        assert_eq!(frame.get(0, 0).unwrap().kind_id, KindId::SAND);
        assert_eq!(frame.get(1, 0).unwrap().kind_id, KindId::AIR);
        assert_eq!(frame.get(0, 0).unwrap().lifetime_ratio, 0.0);
    }

    #[test]
    fn test_fire_lifetime_ratio() {
        let mut grid = Grid::new(1, 1);
        let mut fire = Cell::fire(KindId::FUSE);
        fire.lifetime = 100; // fuse burn time is 200
        *grid.get_mut(0, 0).unwrap() = fire;

        let mut frame = ReadoutFrame::new(1, 1);
        frame.fill_from(&grid);
        assert!((frame.get(0, 0).unwrap().lifetime_ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lifetime_ratio_clamps_at_one() {
        let mut grid = Grid::new(1, 1);
        let mut fire = Cell::fire(KindId::FUSE);
        fire.lifetime = 100_000;
        *grid.get_mut(0, 0).unwrap() = fire;

        let mut frame = ReadoutFrame::new(1, 1);
        frame.fill_from(&grid);
        assert_eq!(frame.get(0, 0).unwrap().lifetime_ratio, 1.0);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let frame = ReadoutFrame::new(2, 2);
        assert!(frame.get(2, 0).is_none());
        assert!(frame.get(0, 2).is_none());
    }
}
