//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for a powderbox simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Side length of the square scheduling chunks (must be at least 4 so
    /// the checkerboard waves keep radius-2 swaps chunk-local)
    pub chunk_size: usize,
    /// Douglas-Peucker simplification tolerance in grid units
    pub simplify_epsilon: f32,
    /// Rigid-body solver timestep in seconds
    pub timestep: f32,
    /// Solver velocity iterations per step
    pub velocity_iterations: u32,
    /// Solver position iterations per step
    pub position_iterations: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            chunk_size: 16,
            simplify_epsilon: 0.5,
            timestep: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
        }
    }
}

impl SimConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.chunk_size < 4 {
            return Err(Error::InvalidConfig(format!(
                "chunk size must be at least 4, got {}",
                self.chunk_size
            )));
        }
        if !self.simplify_epsilon.is_finite() || self.simplify_epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "simplify epsilon must be non-negative, got {}",
                self.simplify_epsilon
            )));
        }
        if !(self.timestep > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        Ok(())
    }

    /// Number of chunk columns
    pub fn chunks_x(&self) -> usize {
        self.width.div_ceil(self.chunk_size)
    }

    /// Number of chunk rows
    pub fn chunks_y(&self) -> usize {
        self.height.div_ceil(self.chunk_size)
    }
}
