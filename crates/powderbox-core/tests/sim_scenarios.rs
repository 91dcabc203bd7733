//! End-to-end simulation scenarios

use glam::Vec2;
use powderbox_core::contour::extract_contours;
use powderbox_core::physics::{Aabb, EarClipPartition, RigidBodySolver, Triangle};
use powderbox_core::rng::{NoiseSource, SeededNoise};
use powderbox_core::world::NoopStats;
use powderbox_core::{SimConfig, Simulation, World};
use powderbox_particles::KindId;

/// Noise source returning a fixed value, for fully deterministic scenarios
struct ConstNoise(f64);

impl NoiseSource for ConstNoise {
    fn noise(&mut self) -> f64 {
        self.0
    }

    fn fork(&self, _stream: u64) -> Self {
        ConstNoise(self.0)
    }
}

fn mean_y(world: &World<SeededNoise>, kind: u8) -> f64 {
    let width = world.config().width;
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, cell) in world.grid().cells().iter().enumerate() {
        if cell.kind == kind {
            sum += (i / width) as f64;
            count += 1;
        }
    }
    assert!(count > 0, "no cells of kind {kind}");
    sum / count as f64
}

#[test]
fn scenario_sand_grain_settles_on_floor() {
    let mut world = World::new(SimConfig::new(5, 5), ConstNoise(0.9)).unwrap();
    world.set_kind(2, 4, KindId::SAND);

    for _ in 0..4 {
        world.tick(&mut NoopStats);
    }

    assert_eq!(world.grid().get(2, 0).unwrap().kind, KindId::SAND);
    for y in 1..5 {
        assert!(world.grid().get(2, y).unwrap().is_air());
    }
}

#[test]
fn scenario_sand_column_leaves_no_air_below() {
    // A column of sand between wood walls settles into a gapless pile
    let mut world = World::new(SimConfig::new(7, 24), SeededNoise::new(21)).unwrap();
    for y in 0..24 {
        world.set_kind(0, y, KindId::WOOD);
        world.set_kind(6, y, KindId::WOOD);
    }
    for y in 12..24 {
        for x in 2..5 {
            world.set_kind(x, y, KindId::SAND);
        }
    }

    for _ in 0..400 {
        world.tick(&mut NoopStats);
    }

    for x in 1..6 {
        for y in 1..24 {
            if world.grid().get(x, y).unwrap().kind == KindId::SAND {
                let below = world.grid().get(x, y - 1).unwrap();
                assert!(
                    !below.is_air(),
                    "air below sand at ({x}, {y}) after settling"
                );
            }
        }
    }
}

#[test]
fn scenario_oil_floats_on_water() {
    let mut world = World::new(SimConfig::new(10, 10), SeededNoise::new(11)).unwrap();
    // Water starts on top, oil underneath
    for x in 0..10 {
        for y in 5..10 {
            world.set_kind(x, y, KindId::WATER);
        }
        for y in 0..5 {
            world.set_kind(x, y, KindId::OIL);
        }
    }

    for _ in 0..200 {
        world.tick(&mut NoopStats);
    }

    let oil_y = mean_y(&world, KindId::OIL);
    let water_y = mean_y(&world, KindId::WATER);
    assert!(
        oil_y > water_y,
        "oil mean y {oil_y:.2} must end above water mean y {water_y:.2}"
    );
}

#[test]
fn scenario_wood_ring_yields_outer_and_hole_contours() {
    let mut world = World::new(SimConfig::new(10, 10), ConstNoise(0.9)).unwrap();
    for i in 0..10 {
        world.set_kind(i, 0, KindId::WOOD);
        world.set_kind(i, 9, KindId::WOOD);
        world.set_kind(0, i, KindId::WOOD);
        world.set_kind(9, i, KindId::WOOD);
    }
    // Sand resting on the ring floor; it merges into the solid boundary
    for x in 1..9 {
        world.set_kind(x, 1, KindId::SAND);
    }
    world.tick(&mut NoopStats);

    let contours = extract_contours(world.solid_mask(), 10, 10);
    assert_eq!(contours.len(), 2, "one outer boundary and one hole");

    let mut areas: Vec<f32> = contours.iter().map(|c| c.signed_area_doubled()).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    // Solid-enclosing outer loop winds opposite to the interior hole
    assert!(areas[0] < 0.0 && areas[1] > 0.0);
    assert!(
        areas[0].abs() > areas[1].abs(),
        "outer loop must enclose more area than the hole"
    );
}

#[test]
fn scenario_fire_on_oil_burns_out_after_burntime() {
    let mut world = World::new(SimConfig::new(1, 1), SeededNoise::new(3)).unwrap();
    world.ignite(0, 0, KindId::OIL);
    let burn_time = powderbox_particles::get(KindId::OIL).burn_time as u64;

    for _ in 0..burn_time {
        world.tick(&mut NoopStats);
        assert_eq!(
            world.grid().get(0, 0).unwrap().kind,
            KindId::FIRE,
            "fire must persist through the fuel's burn time"
        );
    }

    world.tick(&mut NoopStats);
    assert!(world.grid().get(0, 0).unwrap().is_air());
}

#[test]
fn scenario_fire_consumes_fuse_line() {
    // Fire at one end of a fuse line eats its way along it
    let mut world = World::new(SimConfig::new(12, 3), SeededNoise::new(8)).unwrap();
    for x in 0..12 {
        world.set_kind(x, 1, KindId::FUSE);
    }
    world.ignite(0, 1, KindId::FUSE);

    for _ in 0..4000 {
        world.tick(&mut NoopStats);
    }

    let fuse_left = world
        .grid()
        .cells()
        .iter()
        .filter(|c| c.kind == KindId::FUSE || c.secondary == Some(KindId::FUSE))
        .count();
    assert!(
        fuse_left < 12,
        "fire never spread along the fuse ({fuse_left} cells intact)"
    );
}

#[test]
fn scenario_kind_counts_conserved_without_fire_or_acid() {
    let mut world = World::new(SimConfig::new(40, 40), SeededNoise::new(17)).unwrap();
    for x in 0..40 {
        for y in 0..8 {
            world.set_kind(x, y + 8, KindId::WATER);
            world.set_kind(x, y + 16, KindId::OIL);
            world.set_kind(x, y + 24, KindId::SAND);
        }
        world.set_kind(x, 0, KindId::WOOD);
    }

    let count = |world: &World<SeededNoise>, id: u8| {
        world
            .grid()
            .cells()
            .iter()
            .filter(|c| c.kind == id)
            .count()
    };
    let before: Vec<usize> = [KindId::WATER, KindId::OIL, KindId::SAND, KindId::WOOD]
        .iter()
        .map(|&id| count(&world, id))
        .collect();

    for _ in 0..100 {
        world.tick(&mut NoopStats);
    }

    let after: Vec<usize> = [KindId::WATER, KindId::OIL, KindId::SAND, KindId::WOOD]
        .iter()
        .map(|&id| count(&world, id))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn scenario_scene_blob_builds_expected_world() {
    // 4x3 scene, top-left origin: wood across the top, fire bottom-left
    #[rustfmt::skip]
    let blob = vec![
        4, 4, 4, 4,
        0, 0, 0, 0,
        5, 0, 0, 0,
    ];
    let world = World::from_blob(SimConfig::new(4, 3), SeededNoise::new(1), &blob).unwrap();

    for x in 0..4 {
        assert_eq!(world.grid().get(x, 2).unwrap().kind, KindId::WOOD);
    }
    let fire = world.grid().get(0, 0).unwrap();
    assert_eq!(fire.kind, KindId::FIRE);
    assert_eq!(fire.secondary, Some(KindId::OIL));

    // Solid mask is primed before the first tick
    assert_eq!(world.solid_mask().iter().map(|&b| b as usize).sum::<usize>(), 4);
}

#[test]
fn scenario_bad_blob_id_is_rejected() {
    let mut blob = vec![0u8; 16];
    blob[7] = 42;
    let err = World::from_blob(SimConfig::new(4, 4), SeededNoise::new(1), &blob).unwrap_err();
    assert!(format!("{err}").contains("42"));
    assert!(format!("{err}").contains("7"));
}

/// Minimal recording solver for full-pipeline runs
struct MockSolver {
    next_id: u32,
    alive: Vec<u32>,
    statics_seen: usize,
    fixture: Option<Aabb>,
}

impl MockSolver {
    fn covering(aabb: Aabb) -> Self {
        Self {
            next_id: 0,
            alive: Vec::new(),
            statics_seen: 0,
            fixture: Some(aabb),
        }
    }
}

impl RigidBodySolver for MockSolver {
    type Handle = u32;

    fn create_dynamic_body(&mut self, _position: Vec2, _polygon: &[Vec2]) -> u32 {
        self.next_id += 1;
        self.alive.push(self.next_id);
        self.next_id
    }

    fn create_static_body(&mut self, _triangle: &Triangle) -> u32 {
        self.next_id += 1;
        self.alive.push(self.next_id);
        self.statics_seen += 1;
        self.next_id
    }

    fn destroy_body(&mut self, handle: u32) {
        self.alive.retain(|&id| id != handle);
    }

    fn step(&mut self, _timestep: f32, _vel: u32, _pos: u32) {}

    fn any_fixture_in(&self, aabb: &Aabb) -> bool {
        self.fixture.is_some_and(|f| f.intersects(aabb))
    }
}

#[test]
fn scenario_full_pipeline_produces_collision_geometry() {
    let everywhere = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0));
    let mut sim = Simulation::new(
        SimConfig::new(32, 32),
        SeededNoise::new(4),
        MockSolver::covering(everywhere),
        EarClipPartition,
    )
    .unwrap();

    // A wood shelf the solver should collide with
    for x in 2..30 {
        sim.world_mut().set_kind(x, 10, KindId::WOOD);
        sim.world_mut().set_kind(x, 11, KindId::WOOD);
    }
    let body = sim
        .bridge_mut()
        .spawn_dynamic_body(Vec2::new(16.0, 25.0), &[
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]);

    for _ in 0..5 {
        sim.tick(&mut NoopStats);
    }

    assert!(!sim.bridge().triangles().is_empty());
    assert!(sim.bridge().solver().statics_seen > 0);
    // Per-tick statics are gone, the dynamic body is not
    assert_eq!(sim.bridge().solver().alive, vec![body]);

    sim.teardown();
    assert!(sim.bridge().solver().alive.is_empty());
}
