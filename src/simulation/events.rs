//! Deferred world updates.
//!
//! The agent and obstacle passes only read the rosters they iterate; anything
//! that touches another entity is queued here and applied once the pass is
//! over, so no roster is modified while it is being iterated.

use geo::Coord;
use tracing::debug;

use super::obstacle::Obstacle;
use super::params::Params;
use super::world::World;

/// Events that modify world state after a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// An agent fired a projectile.
    Fired {
        /// Muzzle position.
        pos: Coord<f32>,
        /// Heading in degrees.
        direction: f32,
        /// Id of the shooter.
        creator: usize,
    },
    /// An obstacle struck an agent.
    Hit {
        /// Index of the obstacle in the obstacle roster.
        obstacle: usize,
        /// Id of the agent that was struck.
        victim: usize,
        /// Id of the shooter.
        creator: usize,
    },
    /// An obstacle left the arena.
    Escaped {
        /// Index of the obstacle in the obstacle roster.
        obstacle: usize,
    },
}

/// Queue collecting events during a pass.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<WorldEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, WorldEvent> {
        self.events.drain(..)
    }
}

/// Applies all queued events, then compacts the obstacle roster once.
pub fn apply_events(world: &mut World, params: &Params, mut queue: EventQueue) {
    let mut obstacles_to_remove: Vec<usize> = Vec::new();

    for event in queue.drain() {
        match event {
            WorldEvent::Fired {
                pos,
                direction,
                creator,
            } => {
                debug!(creator, direction, "agent fired");
                world.obstacles.push(Obstacle::new(
                    pos,
                    direction,
                    params.projectile_speed,
                    creator,
                ));
            }
            WorldEvent::Hit {
                obstacle,
                victim,
                creator,
            } => {
                debug!(victim, creator, "obstacle hit");
                if let Some(agent) = world.agents.iter_mut().find(|a| a.id == victim) {
                    agent.cost += params.hit_cost;
                    agent.health -= 1;
                }
                if let Some(shooter) = world
                    .agents
                    .iter_mut()
                    .find(|a| a.id == creator && a.is_alive())
                {
                    shooter.cost += params.hit_reward;
                }
                obstacles_to_remove.push(obstacle);
            }
            WorldEvent::Escaped { obstacle } => obstacles_to_remove.push(obstacle),
        }
    }

    if !obstacles_to_remove.is_empty() {
        obstacles_to_remove.sort_unstable();
        obstacles_to_remove.dedup();
        let mut index = 0;
        world.obstacles.retain(|_| {
            let keep = obstacles_to_remove.binary_search(&index).is_err();
            index += 1;
            keep
        });
    }
}
