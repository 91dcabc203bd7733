//! Physics bridge - per-tick collision geometry for the pixel world
//!
//! Every tick the bridge rebuilds static collision geometry from scratch:
//! chunks near rigid bodies are contoured, simplified, triangulated, turned
//! into one static body per triangle, stepped once, and torn down again.
//! Rebuilding beats tracking deltas because the pixel world mutates freely;
//! the chunk AABB gate keeps the cost proportional to where dynamic bodies
//! actually are.

use std::sync::Mutex;

use glam::Vec2;
use rayon::prelude::*;

use super::partition::{Partition, PartitionPolygon, Triangle};
use super::solver::RigidBodySolver;
use crate::config::SimConfig;
use crate::contour::{Contour, douglas_peucker, extract_contours};
use crate::rng::NoiseSource;
use crate::world::World;

pub struct PhysicsBridge<S: RigidBodySolver> {
    solver: S,
    timestep: f32,
    velocity_iterations: u32,
    position_iterations: u32,
    simplify_epsilon: f32,

    /// Dynamic bodies persist across ticks until teardown
    dynamic_bodies: Vec<S::Handle>,

    /// Last tick's outputs, swapped in at tick end for debug readers
    contours: Vec<Contour>,
    triangles: Vec<Triangle>,
}

impl<S: RigidBodySolver> PhysicsBridge<S> {
    pub fn new(solver: S, config: &SimConfig) -> Self {
        Self {
            solver,
            timestep: config.timestep,
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
            simplify_epsilon: config.simplify_epsilon,
            dynamic_bodies: Vec::new(),
            contours: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    /// Create a persistent dynamic body with a convex polygon fixture
    pub fn spawn_dynamic_body(&mut self, position: Vec2, polygon: &[Vec2]) -> S::Handle {
        let handle = self.solver.create_dynamic_body(position, polygon);
        self.dynamic_bodies.push(handle);
        handle
    }

    pub fn dynamic_bodies(&self) -> &[S::Handle] {
        &self.dynamic_bodies
    }

    /// Contours of the last synced tick (simplified, outers CCW)
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Collision triangles of the last synced tick
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Rebuild collision geometry from the world's solid mask, step the
    /// solver once, and destroy the per-tick static bodies again.
    pub fn sync<P, N>(&mut self, world: &World<N>, partition: &P)
    where
        P: Partition + Sync,
        N: NoiseSource,
    {
        let config = world.config();

        // Only chunks with at least one fixture nearby are worth contouring
        let mut gated: Vec<(usize, usize)> = Vec::new();
        for cy in 0..config.chunks_y() {
            for cx in 0..config.chunks_x() {
                if self.solver.any_fixture_in(&world.chunk_aabb(cx, cy)) {
                    gated.push((cx, cy));
                }
            }
        }

        let mask = world.solid_mask();
        let (width, height) = (config.width, config.height);
        let chunk_size = config.chunk_size;
        let epsilon = self.simplify_epsilon;

        let triangle_acc: Mutex<Vec<Triangle>> = Mutex::new(Vec::new());
        let contour_acc: Mutex<Vec<Contour>> = Mutex::new(Vec::new());

        gated.par_iter().for_each(|&(cx, cy)| {
            let x0 = cx * chunk_size;
            let y0 = cy * chunk_size;
            let x1 = ((cx + 1) * chunk_size).min(width);
            let y1 = ((cy + 1) * chunk_size).min(height);
            let (sub_w, sub_h) = (x1 - x0, y1 - y0);

            // Chunk-local mask window; buffers live only for this work unit
            let mut sub = vec![0u8; sub_w * sub_h];
            for ly in 0..sub_h {
                let row = (y0 + ly) * width + x0;
                sub[ly * sub_w..(ly + 1) * sub_w].copy_from_slice(&mask[row..row + sub_w]);
            }

            let origin = Vec2::new(x0 as f32, y0 as f32);
            let mut polygons: Vec<PartitionPolygon> = Vec::new();
            let mut chunk_contours: Vec<Contour> = Vec::new();

            for raw in extract_contours(&sub, sub_w, sub_h) {
                let simplified = douglas_peucker(&raw.vertices, epsilon);
                if simplified.len() < 3 {
                    continue;
                }

                let contour = Contour {
                    vertices: simplified.into_iter().rev().map(|v| v + origin).collect(),
                };
                let area = contour.signed_area_doubled();
                if area.abs() <= f32::EPSILON {
                    continue;
                }
                // After reversal solid boundaries are CCW; clockwise loops
                // are the holes
                polygons.push(PartitionPolygon {
                    vertices: contour.vertices.clone(),
                    is_hole: area < 0.0,
                });
                chunk_contours.push(contour);
            }

            if !polygons.is_empty() {
                let triangles = partition.triangulate(&polygons);
                // Short critical sections: one extend per chunk
                triangle_acc.lock().unwrap().extend(triangles);
                contour_acc.lock().unwrap().extend(chunk_contours);
            }
        });

        let new_triangles = triangle_acc.into_inner().unwrap();
        let new_contours = contour_acc.into_inner().unwrap();

        let mut static_bodies = Vec::with_capacity(new_triangles.len());
        for triangle in &new_triangles {
            static_bodies.push(self.solver.create_static_body(triangle));
        }

        self.solver.step(
            self.timestep,
            self.velocity_iterations,
            self.position_iterations,
        );

        for handle in static_bodies {
            self.solver.destroy_body(handle);
        }

        log::trace!(
            "bridge: {} chunks gated, {} triangles",
            gated.len(),
            new_triangles.len()
        );

        // Swap outputs in only at tick end, never mid-pass
        self.triangles = new_triangles;
        self.contours = new_contours;
    }

    /// Destroy every persistent dynamic body
    pub fn teardown(&mut self) {
        for handle in self.dynamic_bodies.drain(..) {
            self.solver.destroy_body(handle);
        }
    }
}
