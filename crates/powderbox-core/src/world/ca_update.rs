//! Cellular automata update rules - per-kind particle behavior

use powderbox_particles::{KindId, ParticleKind, get as kind};

use super::grid::GridView;
use super::stats::TickTally;
use crate::rng::NoiseSource;

/// Candidate offsets for powders (sand, gunpowder), searched in order
pub const POWDER_OFFSETS: [(i32, i32); 3] = [(0, -1), (1, -1), (-1, -1)];

/// Candidate offsets for liquids (water, oil, acid)
pub const LIQUID_OFFSETS: [(i32, i32); 9] = [
    (0, -1),
    (2, -1),
    (-2, -1),
    (1, -1),
    (-1, -1),
    (2, 0),
    (-2, 0),
    (1, 0),
    (-1, 0),
];

/// Candidate offsets for gases (smoke)
pub const GAS_OFFSETS: [(i32, i32); 5] = [(0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0)];

/// Moore neighbourhood, used by the fire and acid rules
pub const MOORE_NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Chance per fire visit to seed smoke into an air neighbour
const SMOKE_SPAWN_CHANCE: f64 = 0.001;

/// Per-cell rule application - handles material movement and reactions
pub struct ParticleUpdater;

impl ParticleUpdater {
    /// Apply one tick's rule to the cell at `(x, y)`.
    ///
    /// The `updated` flag guards every cell against a second application
    /// within the same tick, including cells displaced into not-yet-scanned
    /// positions.
    pub(crate) fn update_cell<N: NoiseSource>(
        view: &GridView,
        x: i64,
        y: i64,
        noise: &mut N,
        tally: &mut TickTally,
    ) {
        let cell = view.read(x, y);
        if cell.updated {
            return;
        }
        view.mark_updated(x, y);

        // For fire, the burning kind drives motion
        let effective = match cell.kind {
            KindId::FIRE => {
                let Some(secondary) = cell.secondary else {
                    return;
                };
                let burned_out = Self::update_fire(view, x, y, secondary, noise, tally);
                if burned_out {
                    return;
                }
                secondary
            }
            KindId::ACID => {
                Self::update_acid(view, x, y, noise, tally);
                KindId::ACID
            }
            other => other,
        };

        match effective {
            KindId::SAND | KindId::GUNPOWDER => {
                Self::update_motion(view, x, y, kind(effective), &POWDER_OFFSETS, noise, tally);
            }
            KindId::WATER | KindId::OIL | KindId::ACID => {
                Self::update_motion(view, x, y, kind(effective), &LIQUID_OFFSETS, noise, tally);
            }
            KindId::SMOKE => {
                Self::update_motion(view, x, y, kind(effective), &GAS_OFFSETS, noise, tally);
            }
            _ => {}
        }
    }

    /// Density-driven movement: pick the most-preferred in-bounds candidate
    /// and swap with probability based on the density ratio.
    fn update_motion<N: NoiseSource>(
        view: &GridView,
        x: i64,
        y: i64,
        mover: &'static ParticleKind,
        offsets: &[(i32, i32)],
        noise: &mut N,
        tally: &mut TickTally,
    ) {
        let prefer_down = mover.density > kind(KindId::AIR).density;

        // Mirror the candidate list on a fair coin to remove chirality bias
        let inverted = noise.noise() > 0.5;

        let mut best: Option<(i64, i64)> = None;
        let mut best_density = if prefer_down { f64::INFINITY } else { 0.0 };

        for &(dx, dy) in offsets {
            let sx = x + i64::from(if inverted { -dx } else { dx });
            let sy = y + i64::from(dy);
            if !view.in_bounds(sx, sy) {
                continue;
            }

            let candidate = view.read(sx, sy);
            // Immovables never swap; solids cannot displace other solids
            if !candidate.effective_kind().movable || (mover.solid && kind(candidate.kind).solid) {
                continue;
            }

            let candidate_density = candidate.effective_kind().density;
            if (prefer_down && candidate_density < best_density)
                || (!prefer_down && candidate_density > best_density)
            {
                best_density = candidate_density;
                best = Some((sx, sy));
            }
        }

        let Some((sx, sy)) = best else {
            return;
        };

        // Near-equal densities swap rarely, dissimilar ones almost always
        let rel = mover.density / best_density;
        let ratio = if rel <= 1.0 { rel } else { 1.0 / rel };
        if noise.noise() > ratio / 2.0 {
            view.swap(x, y, sx, sy);
            // The displaced candidate must not run again this tick
            view.mark_updated(x, y);
            tally.swaps += 1;
        }
    }

    /// Fire: age, try to spread to one Moore neighbour, revert to air once
    /// the fuel's burn time is exceeded. Returns whether the cell burned out.
    fn update_fire<N: NoiseSource>(
        view: &GridView,
        x: i64,
        y: i64,
        secondary: u8,
        noise: &mut N,
        tally: &mut TickTally,
    ) -> bool {
        let lifetime = view.bump_lifetime(x, y);

        let choice = (noise.noise() * MOORE_NEIGHBOURS.len() as f64) as usize;
        let (dx, dy) = MOORE_NEIGHBOURS[choice.min(MOORE_NEIGHBOURS.len() - 1)];
        let (px, py) = (x + i64::from(dx), y + i64::from(dy));

        if view.in_bounds(px, py) {
            let neighbour = view.read(px, py);
            if noise.noise() < kind(neighbour.kind).flammability {
                view.reinit_fire(px, py, neighbour.kind);
                // Don't let the neighbour spread this tick
                view.mark_updated(px, py);
                tally.ignitions += 1;
            } else if neighbour.kind == KindId::AIR && noise.noise() < SMOKE_SPAWN_CHANCE {
                view.reinit(px, py, KindId::SMOKE);
                tally.smoke_spawns += 1;
            }
        }

        if lifetime > kind(secondary).burn_time {
            view.reinit(x, y, KindId::AIR);
            return true;
        }
        false
    }

    /// Acid: try to dissolve one Moore neighbour to air.
    fn update_acid<N: NoiseSource>(
        view: &GridView,
        x: i64,
        y: i64,
        noise: &mut N,
        tally: &mut TickTally,
    ) {
        let choice = (noise.noise() * MOORE_NEIGHBOURS.len() as f64) as usize;
        let (dx, dy) = MOORE_NEIGHBOURS[choice.min(MOORE_NEIGHBOURS.len() - 1)];
        let (px, py) = (x + i64::from(dx), y + i64::from(dy));

        if view.in_bounds(px, py) {
            let neighbour = view.read(px, py);
            if noise.noise() < kind(neighbour.kind).acidability {
                view.mark_updated(px, py);
                view.reinit(px, py, KindId::AIR);
                tally.dissolutions += 1;
            }
        }
    }
}
