//! Marching squares contour extraction
//!
//! Walks the boundary loops of a solid byte mask over a states grid padded
//! with one zero cell on every side. Each state encodes the 2x2 of solid
//! bits around a corner as a 4-bit integer; states 5 and 10 are the saddle
//! configurations where the exit edge depends on the entry direction.

use glam::Vec2;

/// Ordered, closed loop of vertex positions in grid coordinates.
///
/// Vertices are mid-edge midpoints between consecutive walk cells, so a
/// solid cell `(x, y)` reads as the unit square centred on
/// `(x + 0.5, y + 0.5)`. Solid-enclosing loops come out clockwise in the
/// grid's y-up coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub vertices: Vec<Vec2>,
}

impl Contour {
    /// Twice the signed area (shoelace); negative for solid-enclosing loops
    pub fn signed_area_doubled(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum
    }
}

/// Contours shorter than this many vertices are dropped as noise
const MIN_CONTOUR_VERTICES: usize = 11;

/// Visited bit for entry in the negative sense (saddles), and the only bit
/// used for non-ambiguous states
const VISITED_NEG: u8 = 1;
/// Visited bit for entry in the positive sense (saddles only)
const VISITED_POS: u8 = 2;

/// Solid bit at `(x, y)`, zero outside the mask
#[inline]
fn mask_at(mask: &[u8], x: i64, y: i64, width: i64, height: i64) -> u8 {
    if x < 0 || y < 0 || x >= width || y >= height {
        return 0;
    }
    (mask[(x + y * width) as usize] != 0) as u8
}

/// Next walk cell for a state, counter-clockwise in screen coordinates.
/// Saddle states consult the entry sense. Returns `None` for the two
/// segment-free states.
#[inline]
fn next_cell(state: u8, x: i64, y: i64, from_positive: bool) -> Option<(i64, i64)> {
    match state {
        1 | 9 | 13 => Some((x, y - 1)),
        2 | 3 | 11 => Some((x + 1, y)),
        4 | 6 | 7 => Some((x, y + 1)),
        8 | 12 | 14 => Some((x - 1, y)),
        5 => Some((x, if from_positive { y + 1 } else { y - 1 })),
        10 => Some((if from_positive { x - 1 } else { x + 1 }, y)),
        _ => None,
    }
}

/// Extract every closed boundary loop of a solid byte mask.
///
/// `width` and `height` describe the mask; contours are emitted in mask
/// coordinates. Loops shorter than 11 vertices are dropped.
pub fn extract_contours(mask: &[u8], width: usize, height: usize) -> Vec<Contour> {
    debug_assert_eq!(mask.len(), width * height);
    let (w, h) = (width as i64, height as i64);
    // One padding corner on the positive side; the negative side is covered
    // by the out-of-bounds zero reads
    let (nw, nh) = (w + 1, h + 1);

    let mut states = vec![0u8; (nw * nh) as usize];
    let mut visited = vec![0u8; (nw * nh) as usize];

    for y in 0..nh {
        for x in 0..nw {
            states[(x + y * nw) as usize] = mask_at(mask, x - 1, y - 1, w, h)
                | (mask_at(mask, x, y - 1, w, h) << 1)
                | (mask_at(mask, x, y, w, h) << 2)
                | (mask_at(mask, x - 1, y, w, h) << 3);
        }
    }

    let mut contours = Vec::new();

    for start_y in 0..nh {
        for start_x in 0..nw {
            let state = states[(start_x + start_y * nw) as usize];
            // Saddles are never walk starts; their visit bookkeeping only
            // makes sense with a known entry direction
            if state == 0 || state == 5 || state == 10 || state == 15 {
                continue;
            }
            if visited[(start_x + start_y * nw) as usize] != 0 {
                continue;
            }

            let mut contour = Contour::default();
            let (mut cx, mut cy) = (start_x, start_y);
            let (mut px, mut py) = (start_x, start_y);

            loop {
                let idx = (cx + cy * nw) as usize;
                let current = states[idx];

                // Entry sense for the saddles: which side we came from
                let from_positive = match current {
                    5 => px > cx,
                    10 => py > cy,
                    _ => false,
                };

                let seen = if current == 5 || current == 10 {
                    let bit = if from_positive { VISITED_POS } else { VISITED_NEG };
                    visited[idx] & bit != 0
                } else {
                    visited[idx] != 0
                };
                if seen {
                    break;
                }

                if current == 5 || current == 10 {
                    visited[idx] |= if from_positive { VISITED_POS } else { VISITED_NEG };
                } else {
                    visited[idx] = VISITED_NEG;
                }

                let Some((nx, ny)) = next_cell(current, cx, cy, from_positive) else {
                    // Walks only enter cells with a boundary segment
                    break;
                };

                contour.vertices.push(Vec2::new(
                    cx as f32 + (nx - cx) as f32 * 0.5,
                    cy as f32 + (ny - cy) as f32 * 0.5,
                ));

                (px, py) = (cx, cy);
                (cx, cy) = (nx, ny);
            }

            if contour.vertices.len() >= MIN_CONTOUR_VERTICES {
                contours.push(contour);
            }
        }
    }

    contours
}
