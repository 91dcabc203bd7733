//! Foundational particle types for the powderbox simulation.
//!
//! The kind registry is a closed, read-only table; cells reference kinds by
//! id byte and carry only transient per-cell state.

mod cell;
mod kinds;

pub use cell::Cell;
pub use kinds::{KindId, ParticleKind, get, kind_count, try_get};
