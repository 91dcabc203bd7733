//! Particle kind definitions and registry

use serde::Serialize;

/// Built-in particle kind IDs
pub struct KindId;

impl KindId {
    pub const AIR: u8 = 0;
    pub const SAND: u8 = 1;
    pub const WATER: u8 = 2;
    pub const OIL: u8 = 3;
    pub const WOOD: u8 = 4;
    pub const FIRE: u8 = 5;
    pub const SMOKE: u8 = 6;
    pub const GUNPOWDER: u8 = 7;
    pub const ACID: u8 = 8;
    pub const COTTON: u8 = 9;
    pub const FUSE: u8 = 10;
}

/// Physical attributes of a particle kind
///
/// A negative density marks a kind that never participates in density-driven
/// motion (wood, fire, cotton, fuse).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleKind {
    pub id: u8,
    pub name: &'static str,

    /// Display color (RGB, 0.0 - 1.0)
    pub color: [f32; 3],

    /// Relative density; motion prefers down when above air's density
    pub density: f64,
    /// Chance per fire visit to ignite (0.0 - 1.0)
    pub flammability: f64,
    /// Ticks a fire cell burns before reverting to air
    pub burn_time: i64,
    /// Chance per acid visit to dissolve (0.0 - 1.0)
    pub acidability: f64,

    /// Whether the kind can be displaced by a swap
    pub movable: bool,
    /// Whether the kind contributes to the solid mask / collision geometry
    pub solid: bool,
}

/// The fixed kind table, indexed by id.
static KINDS: [ParticleKind; 11] = [
    ParticleKind {
        id: KindId::AIR,
        name: "Air",
        color: [0.0, 0.0, 0.0],
        density: 1.0,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.0,
        movable: true,
        solid: false,
    },
    ParticleKind {
        id: KindId::SAND,
        name: "Sand",
        color: [0.7, 0.5, 0.26],
        density: 60.0,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.2,
        movable: true,
        solid: true,
    },
    ParticleKind {
        id: KindId::WATER,
        name: "Water",
        color: [0.2, 0.3, 0.8],
        density: 5.0,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.0,
        movable: true,
        solid: false,
    },
    ParticleKind {
        id: KindId::OIL,
        name: "Oil",
        color: [0.8, 0.6, 0.4],
        density: 2.0,
        flammability: 0.04,
        burn_time: 3000,
        acidability: 0.0,
        movable: true,
        solid: false,
    },
    ParticleKind {
        id: KindId::WOOD,
        name: "Wood",
        color: [0.5, 0.2, 0.1],
        density: -1.0,
        flammability: 0.001,
        burn_time: 10000,
        acidability: 0.02,
        movable: false,
        solid: true,
    },
    ParticleKind {
        id: KindId::FIRE,
        name: "Fire",
        color: [0.7, 0.1, 0.0],
        density: -1.0,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.0,
        movable: false,
        solid: false,
    },
    ParticleKind {
        id: KindId::SMOKE,
        name: "Smoke",
        color: [0.1, 0.1, 0.1],
        density: 0.9999,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.0,
        movable: true,
        solid: false,
    },
    ParticleKind {
        id: KindId::GUNPOWDER,
        name: "Gunpowder",
        color: [0.25, 0.25, 0.25],
        density: 40.0,
        flammability: 1.0,
        burn_time: 50,
        acidability: 0.2,
        movable: true,
        solid: true,
    },
    ParticleKind {
        id: KindId::ACID,
        name: "Acid",
        color: [0.25, 0.9, 0.5],
        density: 5.001,
        flammability: 0.0,
        burn_time: 0,
        acidability: 0.0,
        movable: true,
        solid: false,
    },
    ParticleKind {
        id: KindId::COTTON,
        name: "Cotton",
        color: [0.84, 0.84, 0.84],
        density: -1.0,
        flammability: 0.05,
        burn_time: 1000,
        acidability: 0.5,
        movable: false,
        solid: true,
    },
    ParticleKind {
        id: KindId::FUSE,
        name: "Fuse",
        color: [0.3, 0.3, 0.3],
        density: -1.0,
        flammability: 0.3,
        burn_time: 200,
        acidability: 0.5,
        movable: false,
        solid: true,
    },
];

/// Number of registered kinds
pub const fn kind_count() -> usize {
    KINDS.len()
}

/// Get a kind by id, falling back to air for unknown ids
pub fn get(id: u8) -> &'static ParticleKind {
    KINDS.get(id as usize).unwrap_or(&KINDS[0])
}

/// Get a kind by id, or `None` for ids outside the registry
pub fn try_get(id: u8) -> Option<&'static ParticleKind> {
    KINDS.get(id as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_table_position() {
        for (i, kind) in KINDS.iter().enumerate() {
            assert_eq!(kind.id as usize, i, "kind {} out of place", kind.name);
        }
    }

    #[test]
    fn test_registry_attribute_table() {
        // (id, density, flammability, burn_time, acidability, movable, solid)
        let expected: [(u8, f64, f64, i64, f64, bool, bool); 11] = [
            (KindId::AIR, 1.0, 0.0, 0, 0.0, true, false),
            (KindId::SAND, 60.0, 0.0, 0, 0.2, true, true),
            (KindId::WATER, 5.0, 0.0, 0, 0.0, true, false),
            (KindId::OIL, 2.0, 0.04, 3000, 0.0, true, false),
            (KindId::WOOD, -1.0, 0.001, 10000, 0.02, false, true),
            (KindId::FIRE, -1.0, 0.0, 0, 0.0, false, false),
            (KindId::SMOKE, 0.9999, 0.0, 0, 0.0, true, false),
            (KindId::GUNPOWDER, 40.0, 1.0, 50, 0.2, true, true),
            (KindId::ACID, 5.001, 0.0, 0, 0.0, true, false),
            (KindId::COTTON, -1.0, 0.05, 1000, 0.5, false, true),
            (KindId::FUSE, -1.0, 0.3, 200, 0.5, false, true),
        ];

        for (id, density, flammability, burn_time, acidability, movable, solid) in expected {
            let kind = get(id);
            assert_eq!(kind.density, density, "{} density", kind.name);
            assert_eq!(kind.flammability, flammability, "{} flammability", kind.name);
            assert_eq!(kind.burn_time, burn_time, "{} burn_time", kind.name);
            assert_eq!(kind.acidability, acidability, "{} acidability", kind.name);
            assert_eq!(kind.movable, movable, "{} movable", kind.name);
            assert_eq!(kind.solid, solid, "{} solid", kind.name);
        }
    }

    #[test]
    fn test_get_unknown_falls_back_to_air() {
        assert_eq!(get(200).id, KindId::AIR);
    }

    #[test]
    fn test_try_get_rejects_unknown() {
        assert!(try_get(10).is_some());
        assert!(try_get(11).is_none());
        assert!(try_get(255).is_none());
    }

    #[test]
    fn test_kind_count() {
        assert_eq!(kind_count(), 11);
    }
}
