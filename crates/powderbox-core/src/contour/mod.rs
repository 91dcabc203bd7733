//! Boundary contour extraction and simplification

mod marching;
mod simplify;

pub use marching::{Contour, extract_contours};
pub use simplify::douglas_peucker;
