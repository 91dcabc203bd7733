//! World state and tick scheduling

use rayon::prelude::*;

use powderbox_particles::{Cell, KindId};

use super::ca_update::ParticleUpdater;
use super::grid::{Grid, GridView};
use super::snapshot::ReadoutFrame;
use super::stats::{SimStats, TickTally};
use super::{ingest, solid_mask};
use crate::config::SimConfig;
use crate::error::Result;
use crate::rng::{NoiseSource, SeededNoise};

/// Cell scan direction, rotated every tick so no direction accumulates bias
/// across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    /// y ascending, x ascending
    UpRight,
    /// y ascending, x descending
    UpLeft,
    /// y descending, x descending
    DownLeft,
    /// y descending, x ascending
    DownRight,
}

impl ScanOrder {
    pub fn from_tick(tick: u64) -> Self {
        match tick % 4 {
            0 => ScanOrder::UpRight,
            1 => ScanOrder::UpLeft,
            2 => ScanOrder::DownLeft,
            _ => ScanOrder::DownRight,
        }
    }

    pub fn x_ascending(&self) -> bool {
        matches!(self, ScanOrder::UpRight | ScanOrder::DownRight)
    }

    pub fn y_ascending(&self) -> bool {
        matches!(self, ScanOrder::UpRight | ScanOrder::UpLeft)
    }
}

/// Chunk parity order of the four waves: within one wave no two active
/// chunks are neighbours, so radius-2 rules never race across workers.
const WAVE_PARITIES: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// Half-open cell range covered by one scheduling chunk
#[derive(Clone, Copy, Debug)]
struct ChunkRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// The particle world: a dense cell grid advanced by chunk-parallel swap
/// rules, plus the solid byte mask derived from it each tick.
#[derive(Debug)]
pub struct World<N: NoiseSource = SeededNoise> {
    config: SimConfig,
    grid: Grid,
    solid_mask: Vec<u8>,
    noise: N,
    tick_count: u64,
}

impl<N: NoiseSource> World<N> {
    pub fn new(config: SimConfig, noise: N) -> Result<Self> {
        config.validate()?;
        log::info!(
            "creating {}x{} world, {}x{} chunks of {}",
            config.width,
            config.height,
            config.chunks_x(),
            config.chunks_y(),
            config.chunk_size
        );
        let grid = Grid::new(config.width, config.height);
        let solid_mask = vec![0; config.width * config.height];
        Ok(Self {
            config,
            grid,
            solid_mask,
            noise,
            tick_count: 0,
        })
    }

    /// Build a world from a kind-id-per-cell scene blob (top-left origin,
    /// row-major). Fails without committing any cells on a bad id.
    pub fn from_blob(config: SimConfig, noise: N, blob: &[u8]) -> Result<Self> {
        let mut world = Self::new(config, noise)?;
        ingest::load_blob(&mut world.grid, blob)?;
        solid_mask::project(&world.grid, &mut world.solid_mask);
        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// One byte per cell: 1 where the effective kind is solid
    pub fn solid_mask(&self) -> &[u8] {
        &self.solid_mask
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Place a kind at `(x, y)`; out-of-bounds placements are ignored.
    /// Fire placed this way burns oil, matching scene ingest.
    pub fn set_kind(&mut self, x: i64, y: i64, kind: u8) {
        if let Some(cell) = self.grid.get_mut(x, y) {
            *cell = if kind == KindId::FIRE {
                Cell::fire(KindId::OIL)
            } else {
                Cell::new(kind)
            };
        }
    }

    /// Place a fire cell burning `secondary`; ignored out of bounds
    pub fn ignite(&mut self, x: i64, y: i64, secondary: u8) {
        if let Some(cell) = self.grid.get_mut(x, y) {
            *cell = Cell::fire(secondary);
        }
    }

    /// Reset every cell to air and the tick counter to zero
    pub fn reset(&mut self) {
        self.grid.reset();
        self.solid_mask.fill(0);
        self.tick_count = 0;
    }

    /// Advance the simulation by one tick.
    ///
    /// Phases: clear per-cell update guards, run the four checkerboard
    /// waves (chunks within a wave on worker threads), then refresh the
    /// solid mask in a single pass.
    pub fn tick(&mut self, stats: &mut dyn SimStats) {
        for cell in self.grid.cells_mut() {
            cell.updated = false;
        }

        let scan = ScanOrder::from_tick(self.tick_count);
        let chunks_x = self.config.chunks_x();
        let chunks_y = self.config.chunks_y();
        let chunk_size = self.config.chunk_size;
        let (width, height) = (self.config.width, self.config.height);
        let total_chunks = (chunks_x * chunks_y) as u64;
        let tick_count = self.tick_count;

        let mut tally = TickTally::default();
        let noise = &self.noise;

        for (parity_x, parity_y) in WAVE_PARITIES {
            let wave_chunks: Vec<(usize, usize)> = (0..chunks_y)
                .flat_map(|cy| (0..chunks_x).map(move |cx| (cx, cy)))
                .filter(|&(cx, cy)| cx % 2 == parity_x && cy % 2 == parity_y)
                .collect();

            // Safety: wave_chunks holds only same-parity chunks, which the
            // checkerboard contract requires, and the view does not outlive
            // this wave.
            let view = unsafe { GridView::new(&mut self.grid) };

            let wave_tally = wave_chunks
                .par_iter()
                .map(|&(cx, cy)| {
                    let chunk_index = (cy * chunks_x + cx) as u64;
                    let mut chunk_noise =
                        noise.fork(tick_count.wrapping_mul(total_chunks).wrapping_add(chunk_index));
                    let rect = ChunkRect {
                        x0: cx * chunk_size,
                        y0: cy * chunk_size,
                        x1: ((cx + 1) * chunk_size).min(width),
                        y1: ((cy + 1) * chunk_size).min(height),
                    };
                    let mut chunk_tally = TickTally::default();
                    update_chunk(&view, rect, scan, &mut chunk_noise, &mut chunk_tally);
                    chunk_tally
                })
                .reduce(TickTally::default, TickTally::merged);

            tally.merge(wave_tally);
        }

        solid_mask::project(&self.grid, &mut self.solid_mask);

        tally.report(stats);
        if tally.ignitions > 0 || tally.dissolutions > 0 {
            log::debug!(
                "tick {}: {} swaps, {} ignitions, {} dissolutions",
                self.tick_count,
                tally.swaps,
                tally.ignitions,
                tally.dissolutions
            );
        }

        self.tick_count += 1;
    }

    /// Fill the per-cell readout consumed by renderers
    pub fn fill_readout(&self, frame: &mut ReadoutFrame) {
        frame.fill_from(&self.grid);
    }

    /// World-space bounding box of a scheduling chunk
    pub(crate) fn chunk_aabb(&self, cx: usize, cy: usize) -> crate::physics::Aabb {
        let chunk_size = self.config.chunk_size;
        crate::physics::Aabb::new(
            glam::Vec2::new((cx * chunk_size) as f32, (cy * chunk_size) as f32),
            glam::Vec2::new(
                (((cx + 1) * chunk_size).min(self.config.width)) as f32,
                (((cy + 1) * chunk_size).min(self.config.height)) as f32,
            ),
        )
    }
}

/// Run the per-cell rule over one chunk in the tick's scan order
fn update_chunk<N: NoiseSource>(
    view: &GridView,
    rect: ChunkRect,
    scan: ScanOrder,
    noise: &mut N,
    tally: &mut TickTally,
) {
    let ys: Vec<usize> = if scan.y_ascending() {
        (rect.y0..rect.y1).collect()
    } else {
        (rect.y0..rect.y1).rev().collect()
    };
    let xs: Vec<usize> = if scan.x_ascending() {
        (rect.x0..rect.x1).collect()
    } else {
        (rect.x0..rect.x1).rev().collect()
    };

    for &y in &ys {
        for &x in &xs {
            ParticleUpdater::update_cell(view, x as i64, y as i64, noise, tally);
        }
    }
}
