//! Arena state and the per-tick simulation step.
//!
//! A tick runs in fixed order:
//! 1. every agent senses, thinks, turns, moves and possibly fires;
//! 2. the shots of that pass become obstacles;
//! 3. every obstacle moves and is checked against the arena and the agents;
//! 4. hits are applied, spent obstacles and dead agents are purged;
//! 5. global reward shaping runs on the surviving roster.

use geo::{Coord, Intersects, Rect};
use rand::Rng;
use tracing::debug;

use super::agent::{Agent, decode_outputs};
use super::brain::Network;
use super::clock::{Clock, clamp_dt};
use super::error::NetworkError;
use super::events::{self, EventQueue, WorldEvent};
use super::obstacle::Obstacle;
use super::params::Params;
use super::rewards;

/// All live agents and obstacles of the current epoch.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Live agents.
    pub agents: Vec<Agent>,
    /// Projectiles in flight.
    pub obstacles: Vec<Obstacle>,
    /// Simulated seconds since the epoch started.
    pub time: f32,
    /// Ticks since the epoch started.
    pub ticks: u64,
    next_id: usize,
}

impl World {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent at a random position and returns its id.
    pub fn spawn(&mut self, network: Network, params: &Params, rng: &mut impl Rng) -> usize {
        let id = self.allocate_id();
        self.agents.push(Agent::new_random(id, network, params, rng));
        id
    }

    /// Adds an agent at `pos` facing `direction` and returns its id.
    pub fn spawn_at(
        &mut self,
        pos: geo::Coord<f32>,
        direction: f32,
        network: Network,
        params: &Params,
    ) -> usize {
        let id = self.allocate_id();
        self.agents.push(Agent::new(id, pos, direction, network, params));
        id
    }

    /// Removes every agent and obstacle and resets the epoch clock.
    pub fn clear(&mut self) {
        self.agents.clear();
        self.obstacles.clear();
        self.time = 0.0;
        self.ticks = 0;
        self.next_id = 0;
    }

    /// Looks up a live agent by id.
    pub fn agent(&self, id: usize) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Id of the first live agent whose hitbox contains `point`.
    pub fn agent_at(&self, point: Coord<f32>, size: f32) -> Option<usize> {
        self.agents
            .iter()
            .find(|a| a.hitbox(size).intersects(&point))
            .map(|a| a.id)
    }

    /// Advances by the time reported by `clock`, floored at `min_dt`.
    /// Returns the delta that was used.
    pub fn tick(
        &mut self,
        params: &Params,
        clock: &mut dyn Clock,
        rng: &mut impl Rng,
    ) -> Result<f32, NetworkError> {
        let dt = clamp_dt(clock.elapsed(), params.min_dt);
        self.step(params, dt, rng)?;
        Ok(dt)
    }

    /// Advances the simulation by one tick of `dt` seconds.
    pub fn step(&mut self, params: &Params, dt: f32, rng: &mut impl Rng) -> Result<(), NetworkError> {
        self.time += dt;
        self.ticks += 1;

        // agent pass: every agent sees the hitboxes as they were at tick start
        let hitboxes: Vec<(usize, Rect<f32>)> = self
            .agents
            .iter()
            .map(|a| (a.id, a.hitbox(params.agent_size)))
            .collect();

        let mut shots = EventQueue::new();
        for agent in &mut self.agents {
            agent.update_rays();
            let inputs = agent.sense(hitboxes.iter().map(|(id, r)| (*id, r)), params, rng);
            let outputs = agent.network.forward(&inputs)?;
            let actuation = decode_outputs(&outputs.to_vec(), params);

            agent.actuate(actuation);
            agent.advance(dt, params);
            agent.update_rays();

            if agent.try_fire(actuation.fire, dt, params) {
                shots.push(WorldEvent::Fired {
                    pos: agent.pos,
                    direction: agent.direction,
                    creator: agent.id,
                });
            }
        }
        events::apply_events(self, params, shots);

        // obstacle pass
        let mut impacts = EventQueue::new();
        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            obstacle.update(dt);

            if obstacle.is_out_of_bounds(params.arena_width, params.arena_height) {
                impacts.push(WorldEvent::Escaped { obstacle: index });
                continue;
            }

            let hitbox = obstacle.hitbox(params.projectile_size);
            if let Some(victim) = self.agents.iter().find(|a| {
                a.id != obstacle.creator
                    && a.is_alive()
                    && a.hitbox(params.agent_size).intersects(&hitbox)
            }) {
                impacts.push(WorldEvent::Hit {
                    obstacle: index,
                    victim: victim.id,
                    creator: obstacle.creator,
                });
            }
        }
        events::apply_events(self, params, impacts);

        let before = self.agents.len();
        self.agents.retain(Agent::is_alive);
        if self.agents.len() < before {
            debug!(removed = before - self.agents.len(), tick = self.ticks, "agents died");
        }

        rewards::apply_shaping(&mut self.agents, params, dt);
        Ok(())
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
