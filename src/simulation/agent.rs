//! Agent state, kinematics and sensing.
//!
//! Agents move on a torus, turn by a bounded angle each tick, and see the
//! world through a fan of [`Ray`]s. Their behaviour is entirely decided by the
//! [`Network`] they own.

use geo::{Coord, Rect, coord};
use rand::Rng;

use super::brain::Network;
use super::params::Params;
use super::ray::Ray;

/// An autonomous agent controlled by a neural network.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier within the current epoch.
    pub id: usize,
    /// Centre of the hitbox.
    pub pos: Coord<f32>,
    /// Heading in degrees, kept in `[0, 360)`.
    pub direction: f32,
    /// Forward speed in arena units per second.
    pub speed: f32,
    /// Turn rate in degrees per tick.
    pub angular_velocity: f32,
    /// Remaining hit points; the agent is removed at zero.
    pub health: i32,
    /// Accumulated fitness, lower is better.
    pub cost: f32,
    /// Seconds until the agent may fire again.
    pub cooldown: f32,
    /// Controller network.
    pub network: Network,
    /// Perception rays, in fan order.
    pub rays: Vec<Ray>,
}

/// Motor commands decoded from the network outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actuation {
    /// Forward speed.
    pub speed: f32,
    /// Turn rate.
    pub angular_velocity: f32,
    /// Whether the fire output crossed its threshold.
    pub fire: bool,
}

impl Agent {
    /// Creates an agent at `pos` facing `direction` with full health.
    pub fn new(id: usize, pos: Coord<f32>, direction: f32, network: Network, params: &Params) -> Self {
        let mut agent = Self {
            id,
            pos,
            direction: normalize_degrees(direction),
            speed: 0.0,
            angular_velocity: 0.0,
            health: params.initial_health,
            cost: 0.0,
            cooldown: 0.0,
            network,
            rays: Ray::fan(params.num_rays, params.fov),
        };
        agent.update_rays();
        agent
    }

    /// Creates an agent at a uniformly random position and heading.
    pub fn new_random(id: usize, network: Network, params: &Params, rng: &mut impl Rng) -> Self {
        let pos = coord! {
            x: rng.random_range(0.0..params.arena_width),
            y: rng.random_range(0.0..params.arena_height),
        };
        let direction = rng.random_range(0.0..360.0);
        Self::new(id, pos, direction, network, params)
    }

    /// Returns `true` while the agent has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Square hitbox of side `size` centred on the agent.
    pub fn hitbox(&self, size: f32) -> Rect<f32> {
        centered_square(self.pos, size)
    }

    /// Re-aims every ray from the current position and heading.
    pub fn update_rays(&mut self) {
        let (pos, direction) = (self.pos, self.direction);
        for ray in &mut self.rays {
            ray.reposition(pos, direction);
        }
    }

    /// Builds the network input: normalised ray distances followed by the
    /// normalised speed and turn rate.
    pub fn sense<'a, I>(&self, targets: I, params: &Params, rng: &mut impl Rng) -> Vec<f32>
    where
        I: IntoIterator<Item = (usize, &'a Rect<f32>)> + Clone,
    {
        let max_distance = params.max_ray_distance();
        let mut inputs = Vec::with_capacity(self.rays.len() + 2);

        for ray in &self.rays {
            let hit = ray.cast_all(targets.clone(), self.id);
            let mut reading = super::ray::normalize_distance(hit, max_distance);
            if params.input_noise > 0.0 {
                reading += rng.random_range(-params.input_noise..=params.input_noise);
                reading = reading.clamp(0.0, 1.0);
            }
            inputs.push(reading);
        }

        inputs.push(normalize_symmetric(self.speed, params.max_speed));
        inputs.push(normalize_symmetric(
            self.angular_velocity,
            params.max_angular_velocity,
        ));
        inputs
    }

    /// Applies motor commands and turns the agent.
    pub fn actuate(&mut self, actuation: Actuation) {
        self.speed = actuation.speed;
        self.angular_velocity = actuation.angular_velocity;
        self.direction = normalize_degrees(self.direction + self.angular_velocity);
    }

    /// Advances the position by `speed · dt` along the heading and wraps it
    /// onto the arena.
    pub fn advance(&mut self, dt: f32, params: &Params) {
        let rad = self.direction.to_radians();
        self.pos.x += rad.cos() * self.speed * dt;
        self.pos.y -= rad.sin() * self.speed * dt;
        wrap_around_mut(&mut self.pos, params.arena_width, params.arena_height);
    }

    /// Fires if asked to and off cooldown, then runs the cooldown down by `dt`.
    ///
    /// Returns `true` if a shot was fired; the fire cost is already charged.
    pub fn try_fire(&mut self, wants_fire: bool, dt: f32, params: &Params) -> bool {
        let fired = wants_fire && self.cooldown <= 0.0;
        if fired {
            self.cost += params.fire_cost;
            self.cooldown = params.fire_cooldown;
        }
        self.cooldown = (self.cooldown - dt).max(0.0);
        fired
    }
}

/// Decodes `[throttle, heading_target, fire_flag]` into motor commands.
pub fn decode_outputs(outputs: &[f32], params: &Params) -> Actuation {
    let throttle = outputs.first().copied().unwrap_or(0.0);
    let heading_target = outputs.get(1).copied().unwrap_or(0.5);
    let fire_flag = outputs.get(2).copied().unwrap_or(0.0);

    let max_speed = params.max_speed;
    let max_angvel = params.max_angular_velocity;

    let speed = (throttle * max_speed).clamp(-max_speed, max_speed);
    let angular_velocity = (2.0 * (heading_target - 0.5) * max_angvel).clamp(-max_angvel, max_angvel);

    Actuation {
        speed: apply_deadzone(speed, params.deadzone * max_speed),
        angular_velocity: apply_deadzone(angular_velocity, params.deadzone * max_angvel),
        fire: fire_flag >= 0.5,
    }
}

/// Snaps values whose magnitude is below `threshold` to exactly zero.
pub fn apply_deadzone(value: f32, threshold: f32) -> f32 {
    if value.abs() < threshold { 0.0 } else { value }
}

/// Maps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wraps a position around the arena boundaries (toroidal topology).
pub fn wrap_around_mut(pos: &mut Coord<f32>, width: f32, height: f32) {
    pos.x = wrap(pos.x, width);
    pos.y = wrap(pos.y, height);
}

/// Square of side `size` centred on `center`.
pub fn centered_square(center: Coord<f32>, size: f32) -> Rect<f32> {
    let half = size / 2.0;
    Rect::new(
        coord! { x: center.x - half, y: center.y - half },
        coord! { x: center.x + half, y: center.y + half },
    )
}

fn wrap(value: f32, extent: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    // rem_euclid can round up to `extent` for tiny negative inputs
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}

fn normalize_symmetric(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        (value + max) / (2.0 * max)
    } else {
        0.5
    }
}
