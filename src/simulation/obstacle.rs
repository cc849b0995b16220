//! Projectiles fired by agents.
//!
//! Obstacles fly in a straight line at constant velocity. They do not wrap
//! around the arena: leaving it or touching an agent other than their creator
//! destroys them.

use geo::{Coord, Rect, coord};

use super::agent::centered_square;

/// A projectile fired by an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Current position.
    pub pos: Coord<f32>,
    /// Velocity in arena units per second.
    pub velocity: Coord<f32>,
    /// Id of the agent that fired it, used to attribute hits.
    pub creator: usize,
}

impl Obstacle {
    /// Creates an obstacle at `pos` moving along `direction` (degrees) at `speed`.
    pub fn new(pos: Coord<f32>, direction: f32, speed: f32, creator: usize) -> Self {
        let rad = direction.to_radians();
        Self {
            pos,
            velocity: coord! { x: rad.cos() * speed, y: -rad.sin() * speed },
            creator,
        }
    }

    /// Moves the obstacle by `velocity · dt`.
    pub fn update(&mut self, dt: f32) {
        self.pos = self.pos + self.velocity * dt;
    }

    /// Returns `true` once the obstacle has left `[0, width) × [0, height)`.
    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        !(0.0..width).contains(&self.pos.x) || !(0.0..height).contains(&self.pos.y)
    }

    /// Square hitbox of side `size` centred on the obstacle.
    pub fn hitbox(&self, size: f32) -> Rect<f32> {
        centered_square(self.pos, size)
    }
}
