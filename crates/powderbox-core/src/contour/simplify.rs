//! Iterative Douglas-Peucker contour simplification

use glam::Vec2;

/// Perpendicular distance from `p` to the line through `s` and `e`
fn perpendicular_distance(p: Vec2, s: Vec2, e: Vec2) -> f32 {
    let len = (e - s).length();
    if len <= f32::EPSILON {
        return (p - s).length();
    }
    ((e.x - s.x) * (s.y - p.y) - (s.x - p.x) * (e.y - s.y)).abs() / len
}

/// Simplify a vertex chain: drop every vertex closer than `epsilon` to the
/// chain of surviving segments. Stack-based rather than recursive; order is
/// preserved.
pub fn douglas_peucker(vertices: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    if vertices.len() < 3 {
        return vertices.to_vec();
    }

    let mut keep = vec![true; vertices.len()];
    let mut intervals = vec![(0usize, vertices.len() - 1)];

    while let Some((start, end)) = intervals.pop() {
        let mut dmax = 0.0f32;
        let mut index = start;

        for i in (start + 1)..end {
            if keep[i] {
                let d = perpendicular_distance(vertices[i], vertices[start], vertices[end]);
                if d > dmax {
                    index = i;
                    dmax = d;
                }
            }
        }

        if dmax > epsilon {
            intervals.push((start, index));
            intervals.push((index, end));
        } else {
            for flag in &mut keep[(start + 1)..end] {
                *flag = false;
            }
        }
    }

    vertices
        .iter()
        .zip(&keep)
        .filter_map(|(v, &k)| k.then_some(*v))
        .collect()
}
