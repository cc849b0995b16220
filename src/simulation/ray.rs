//! Ray-cast perception.
//!
//! Each agent carries a fan of rays spread evenly across its field of view.
//! A ray is an infinite half-line from the agent's centre; casting it against a
//! rectangular hitbox yields the distance to the nearest edge crossing in
//! front of the origin.

use geo::{Coord, Rect, coord};

/// Cross products smaller than this are treated as parallel lines.
const PARALLEL_EPSILON: f32 = 1e-9;

/// Tolerance used when testing whether a crossing lies on an edge segment.
const SEGMENT_EPSILON: f32 = 1e-6;

/// A perception ray with a fixed offset inside the agent's field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Current origin (the owning agent's position).
    pub origin: Coord<f32>,
    /// Absolute angle in degrees, counter-clockwise with y pointing down.
    pub angle: f32,
    /// Offset from the owning agent's heading in degrees.
    pub offset: f32,
}

impl Ray {
    /// Creates a ray at the origin pointing along `offset`.
    pub fn new(offset: f32) -> Self {
        Self {
            origin: coord! { x: 0.0, y: 0.0 },
            angle: offset,
            offset,
        }
    }

    /// Builds `count` rays spread evenly across `fov` degrees, centred on the
    /// heading. A single ray looks straight ahead.
    pub fn fan(count: usize, fov: f32) -> Vec<Ray> {
        if count == 1 {
            return vec![Ray::new(0.0)];
        }
        let step = fov / (count as f32 - 1.0);
        (0..count)
            .map(|i| Ray::new(-fov / 2.0 + i as f32 * step))
            .collect()
    }

    /// Moves the ray to `origin` and aims it at `heading + offset`.
    pub fn reposition(&mut self, origin: Coord<f32>, heading: f32) {
        self.origin = origin;
        self.angle = heading + self.offset;
    }

    /// Unit direction vector in screen coordinates (y grows downwards).
    pub fn direction(&self) -> Coord<f32> {
        let rad = self.angle.to_radians();
        coord! { x: rad.cos(), y: -rad.sin() }
    }

    /// Distance from the origin to the nearest point where the ray crosses
    /// one of the rectangle's edges, or `None` if it misses.
    pub fn intersect(&self, rect: &Rect<f32>) -> Option<f32> {
        let dir = self.direction();
        rect.to_lines()
            .iter()
            .filter_map(|edge| cross_edge(self.origin, dir, edge.start, edge.end))
            .min_by(f32::total_cmp)
    }

    /// Nearest hit among `targets`, skipping the target whose id is `exclude`.
    pub fn cast_all<'a, I>(&self, targets: I, exclude: usize) -> Option<f32>
    where
        I: IntoIterator<Item = (usize, &'a Rect<f32>)>,
    {
        targets
            .into_iter()
            .filter(|(id, _)| *id != exclude)
            .filter_map(|(_, rect)| self.intersect(rect))
            .min_by(f32::total_cmp)
    }
}

/// Maps a cast result to a network input in `[0, 1]`; a miss reads as 1.
pub fn normalize_distance(hit: Option<f32>, max_distance: f32) -> f32 {
    match hit {
        Some(d) if max_distance > 0.0 => (d / max_distance).clamp(0.0, 1.0),
        Some(_) => 0.0,
        None => 1.0,
    }
}

/// Intersects the half-line `origin + t·dir` (t ≥ 0) with the segment `a–b`.
fn cross_edge(origin: Coord<f32>, dir: Coord<f32>, a: Coord<f32>, b: Coord<f32>) -> Option<f32> {
    let edge = b - a;
    let denom = cross(dir, edge);
    if denom.abs() < PARALLEL_EPSILON {
        // parallel or coincident
        return None;
    }

    let to_edge = a - origin;
    let t = cross(to_edge, edge) / denom;
    let u = cross(to_edge, dir) / denom;

    if !t.is_finite() || !u.is_finite() {
        return None;
    }
    if t < 0.0 || !(-SEGMENT_EPSILON..=1.0 + SEGMENT_EPSILON).contains(&u) {
        return None;
    }

    // dir is a unit vector, so t is already the euclidean distance
    Some(t)
}

fn cross(a: Coord<f32>, b: Coord<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}
