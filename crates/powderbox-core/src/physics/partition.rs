//! Polygon partitioning - hole removal and triangulation
//!
//! The bridge hands polygons to an abstract `Partition` collaborator.
//! `EarClipPartition` is the built-in implementation: holes are bridged
//! into their enclosing outer polygon, then each simple polygon is
//! ear-clipped. Bad polygons yield an empty (or partial) triangle list and
//! never an error; the bridge just gets no collision geometry for them.

use glam::Vec2;

/// A single collision triangle in grid coordinates
pub type Triangle = [Vec2; 3];

/// Input polygon for triangulation. Outer boundaries wind counter-clockwise,
/// holes clockwise.
#[derive(Clone, Debug)]
pub struct PartitionPolygon {
    pub vertices: Vec<Vec2>,
    pub is_hole: bool,
}

/// Abstract triangulation collaborator
pub trait Partition {
    /// Remove holes and triangulate the polygon set
    fn triangulate(&self, polygons: &[PartitionPolygon]) -> Vec<Triangle>;
}

const EPS: f32 = 1e-6;

#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn signed_area_doubled(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

fn point_in_polygon(vertices: &[Vec2], p: Vec2) -> bool {
    let n = vertices.len();
    let mut inside = false;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            if a.x + t * (b.x - a.x) > p.x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether segments `a0-a1` and `b0-b1` intersect, endpoints included
fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);

    if ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
    {
        return true;
    }

    let on_segment = |p: Vec2, q: Vec2, r: Vec2| {
        r.x >= p.x.min(q.x) - EPS
            && r.x <= p.x.max(q.x) + EPS
            && r.y >= p.y.min(q.y) - EPS
            && r.y <= p.y.max(q.y) + EPS
    };
    (d1.abs() <= EPS && on_segment(b0, b1, a0))
        || (d2.abs() <= EPS && on_segment(b0, b1, a1))
        || (d3.abs() <= EPS && on_segment(a0, a1, b0))
        || (d4.abs() <= EPS && on_segment(a0, a1, b1))
}

/// Whether `p` lies strictly inside the CCW triangle `(a, b, c)`
#[inline]
fn strictly_inside(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> bool {
    cross(a, b, p) > EPS && cross(b, c, p) > EPS && cross(c, a, p) > EPS
}

/// Drop consecutive duplicates (and a duplicated closing vertex)
fn dedup_ring(vertices: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(vertices.len());
    for &v in vertices {
        if out.last().is_none_or(|&last| (last - v).length_squared() > EPS) {
            out.push(v);
        }
    }
    while out.len() > 1 && (out[0] - *out.last().unwrap()).length_squared() <= EPS {
        out.pop();
    }
    out
}

/// Ear-clip a simple CCW polygon. Returns whatever triangles were clipped
/// before running out of ears; a degenerate polygon yields an empty list.
fn ear_clip(vertices: &[Vec2]) -> Vec<Triangle> {
    let verts = dedup_ring(vertices);
    if verts.len() < 3 {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..verts.len()).collect();
    let mut triangles = Vec::with_capacity(verts.len() - 2);

    while indices.len() > 3 {
        let n = indices.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = verts[indices[(i + n - 1) % n]];
            let cur = verts[indices[i]];
            let next = verts[indices[(i + 1) % n]];

            // Reflex corners cannot be ears
            if cross(prev, cur, next) <= EPS {
                continue;
            }

            let blocked = indices.iter().enumerate().any(|(j, &vi)| {
                if j == i || j == (i + n - 1) % n || j == (i + 1) % n {
                    return false;
                }
                strictly_inside(prev, cur, next, verts[vi])
            });
            if blocked {
                continue;
            }

            triangles.push([prev, cur, next]);
            indices.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            log::warn!(
                "ear clipping stalled with {} vertices left; emitting partial triangulation",
                indices.len()
            );
            return triangles;
        }
    }

    let (a, b, c) = (verts[indices[0]], verts[indices[1]], verts[indices[2]]);
    if cross(a, b, c) > EPS {
        triangles.push([a, b, c]);
    }
    triangles
}

/// Bridge every hole into `polygon` (CCW) producing one simple polygon.
/// Holes wind clockwise. A hole with no visible bridge target is dropped.
fn remove_holes(mut polygon: Vec<Vec2>, mut holes: Vec<Vec<Vec2>>) -> Vec<Vec2> {
    // Rightmost hole first, so later bridges cannot occlude earlier ones
    holes.sort_by(|a, b| {
        let ax = a.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let bx = b.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        bx.partial_cmp(&ax).unwrap_or(std::cmp::Ordering::Equal)
    });

    while let Some(hole) = holes.first().cloned() {
        holes.remove(0);

        let h_idx = (0..hole.len())
            .max_by(|&a, &b| {
                hole[a]
                    .x
                    .partial_cmp(&hole[b].x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0);
        let hp = hole[h_idx];
        let hn = hole.len();
        let pn = polygon.len();

        let mut best: Option<(usize, f32)> = None;
        'candidate: for (i, &p) in polygon.iter().enumerate() {
            // Bridges run rightward out of the hole's rightmost vertex
            if p.x <= hp.x {
                continue;
            }

            for j in 0..pn {
                let k = (j + 1) % pn;
                if j == i || k == i {
                    continue;
                }
                if segments_intersect(hp, p, polygon[j], polygon[k]) {
                    continue 'candidate;
                }
            }
            for j in 0..hn {
                let k = (j + 1) % hn;
                if j == h_idx || k == h_idx {
                    continue;
                }
                if segments_intersect(hp, p, hole[j], hole[k]) {
                    continue 'candidate;
                }
            }
            for other in &holes {
                let on = other.len();
                for j in 0..on {
                    if segments_intersect(hp, p, other[j], other[(j + 1) % on]) {
                        continue 'candidate;
                    }
                }
            }

            let dist = (p - hp).length_squared();
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }

        let Some((i, _)) = best else {
            log::warn!("no visible bridge target for hole; dropping it");
            continue;
        };

        // polygon[..=i] -> full hole cycle from h_idx back to itself -> polygon[i..]
        let mut merged = Vec::with_capacity(pn + hn + 2);
        merged.extend_from_slice(&polygon[..=i]);
        merged.extend_from_slice(&hole[h_idx..]);
        merged.extend_from_slice(&hole[..=h_idx]);
        merged.extend_from_slice(&polygon[i..]);
        polygon = merged;
    }

    polygon
}

/// Built-in hole-removal + ear-clipping triangulator
#[derive(Default)]
pub struct EarClipPartition;

impl Partition for EarClipPartition {
    fn triangulate(&self, polygons: &[PartitionPolygon]) -> Vec<Triangle> {
        let mut outers: Vec<Vec<Vec2>> = Vec::new();
        let mut holes: Vec<Vec<Vec2>> = Vec::new();

        for polygon in polygons {
            let mut vertices = dedup_ring(&polygon.vertices);
            if vertices.len() < 3 {
                continue;
            }
            let area = signed_area_doubled(&vertices);
            if area.abs() <= EPS {
                continue;
            }
            // Normalize winding: outers CCW, holes CW
            if polygon.is_hole {
                if area > 0.0 {
                    vertices.reverse();
                }
                holes.push(vertices);
            } else {
                if area < 0.0 {
                    vertices.reverse();
                }
                outers.push(vertices);
            }
        }

        let mut triangles = Vec::new();
        for outer in outers {
            let contained: Vec<Vec<Vec2>> = holes
                .iter()
                .filter(|hole| point_in_polygon(&outer, hole[0]))
                .cloned()
                .collect();
            let simple = remove_holes(outer, contained);
            triangles.extend(ear_clip(&simple));
        }
        triangles
    }
}
