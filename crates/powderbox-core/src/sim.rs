//! Top-level simulation facade
//!
//! Couples the particle world to the physics bridge: each tick first
//! advances the cell grid, then rebuilds collision geometry and steps the
//! solver against it.

use crate::config::SimConfig;
use crate::error::Result;
use crate::physics::{Partition, PhysicsBridge, RigidBodySolver};
use crate::rng::{NoiseSource, SeededNoise};
use crate::world::{ReadoutFrame, Renderer, SimStats, World};

pub struct Simulation<S: RigidBodySolver, P: Partition, N: NoiseSource = SeededNoise> {
    world: World<N>,
    bridge: PhysicsBridge<S>,
    partition: P,
}

impl<S, P, N> Simulation<S, P, N>
where
    S: RigidBodySolver,
    P: Partition + Sync,
    N: NoiseSource,
{
    pub fn new(config: SimConfig, noise: N, solver: S, partition: P) -> Result<Self> {
        let bridge = PhysicsBridge::new(solver, &config);
        let world = World::new(config, noise)?;
        Ok(Self {
            world,
            bridge,
            partition,
        })
    }

    /// Build the world from a scene blob (see `World::from_blob`)
    pub fn from_blob(
        config: SimConfig,
        noise: N,
        solver: S,
        partition: P,
        blob: &[u8],
    ) -> Result<Self> {
        let bridge = PhysicsBridge::new(solver, &config);
        let world = World::from_blob(config, noise, blob)?;
        Ok(Self {
            world,
            bridge,
            partition,
        })
    }

    pub fn world(&self) -> &World<N> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<N> {
        &mut self.world
    }

    pub fn bridge(&self) -> &PhysicsBridge<S> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut PhysicsBridge<S> {
        &mut self.bridge
    }

    /// Advance everything by one tick: particles first, then collision
    /// geometry and the solver step
    pub fn tick(&mut self, stats: &mut dyn SimStats) {
        self.world.tick(stats);
        self.bridge.sync(&self.world, &self.partition);
    }

    /// Hand the current readout and debug contours to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer, frame: &mut ReadoutFrame) {
        self.world.fill_readout(frame);
        renderer.present(frame, self.bridge.contours());
    }

    /// Destroy persistent rigid bodies; the world itself needs no teardown
    pub fn teardown(&mut self) {
        self.bridge.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Aabb, EarClipPartition, Triangle};
    use crate::world::NoopStats;
    use glam::Vec2;
    use powderbox_particles::KindId;

    struct NullSolver;

    impl RigidBodySolver for NullSolver {
        type Handle = u32;

        fn create_dynamic_body(&mut self, _position: Vec2, _polygon: &[Vec2]) -> u32 {
            0
        }
        fn create_static_body(&mut self, _triangle: &Triangle) -> u32 {
            0
        }
        fn destroy_body(&mut self, _handle: u32) {}
        fn step(&mut self, _timestep: f32, _vel: u32, _pos: u32) {}
        fn any_fixture_in(&self, _aabb: &Aabb) -> bool {
            false
        }
    }

    #[test]
    fn test_tick_advances_world() {
        let mut sim = Simulation::new(
            SimConfig::new(16, 16),
            SeededNoise::new(5),
            NullSolver,
            EarClipPartition,
        )
        .unwrap();

        sim.world_mut().set_kind(8, 8, KindId::SAND);
        sim.tick(&mut NoopStats);

        assert_eq!(sim.world().tick_count(), 1);
        let sand: Vec<usize> = sim
            .world()
            .grid()
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(i, c)| (c.kind == KindId::SAND).then_some(i))
            .collect();
        assert_eq!(sand.len(), 1, "ticking must conserve the grain");
    }

    #[test]
    fn test_from_blob_round_trip() {
        let blob = vec![KindId::AIR; 16 * 16];
        let sim = Simulation::from_blob(
            SimConfig::new(16, 16),
            SeededNoise::new(5),
            NullSolver,
            EarClipPartition,
            &blob,
        )
        .unwrap();
        assert!(sim.world().grid().cells().iter().all(|c| c.is_air()));
    }

    #[test]
    fn test_renderer_receives_frame() {
        struct CapturingRenderer {
            cells: usize,
            contours: usize,
        }

        impl Renderer for CapturingRenderer {
            fn present(&mut self, frame: &ReadoutFrame, contours: &[crate::contour::Contour]) {
                self.cells = frame.cells.len();
                self.contours = contours.len();
            }
        }

        let mut sim = Simulation::new(
            SimConfig::new(8, 8),
            SeededNoise::new(5),
            NullSolver,
            EarClipPartition,
        )
        .unwrap();
        sim.tick(&mut NoopStats);

        let mut renderer = CapturingRenderer {
            cells: 0,
            contours: 0,
        };
        let mut frame = ReadoutFrame::new(8, 8);
        sim.render(&mut renderer, &mut frame);
        assert_eq!(renderer.cells, 64);
        assert_eq!(renderer.contours, 0);
    }
}
