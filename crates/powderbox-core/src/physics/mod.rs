//! Rigid-body coupling - solver abstraction, triangulation, per-tick bridge

mod bridge;
mod partition;
mod solver;

pub use bridge::PhysicsBridge;
pub use partition::{EarClipPartition, Partition, PartitionPolygon, Triangle};
pub use solver::{Aabb, RigidBodySolver};
