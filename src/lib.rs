//! # Neuroarena - Neuro-evolution of Agents in a 2D Arena
//!
//! A population of agents, each driven by a small fully connected neural network,
//! moves around a toroidal arena, senses its surroundings with ray casts and fires
//! projectiles at its neighbours. Every epoch the agents that stayed alive are
//! ranked by accumulated cost and the best networks seed the next generation.
//!
//! ## Features
//!
//! - Feed-forward networks with sigmoid activations and a flat text format
//! - Ray-cast vision against axis-aligned hitboxes
//! - Projectile combat with cooldowns, hit costs and hit rewards
//! - Reward shaping for novelty, proximity and an optional goal region
//! - Epoch-based selection with cloning, mutation and a persisted champion
//! - Frame-steppable evolution loop for interactive front ends
//!
//! ## Core Modules
//!
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::agent`] - Agent state, sensing and actuation
//! - [`simulation::world`] - The per-tick simulation step
//! - [`simulation::evolution`] - Epoch loop and selection
//! - [`simulation::champion`] - Persistent champion store

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state, perception and motion.
    pub mod agent;
    /// Feed-forward neural network and its text codec.
    pub mod brain;
    /// File-backed store for the best network.
    pub mod champion;
    /// Sources of the per-tick time delta.
    pub mod clock;
    /// Error types.
    pub mod error;
    /// Events collected during a tick and applied afterwards.
    pub mod events;
    /// Epoch loop: spawning, ranking, selection and persistence.
    pub mod evolution;
    /// Per-epoch statistics.
    pub mod history;
    /// Projectiles fired by agents.
    pub mod obstacle;
    /// Simulation parameters.
    pub mod params;
    /// Ray casting against hitboxes.
    pub mod ray;
    /// Presentation interface.
    pub mod renderer;
    /// Global reward shaping.
    pub mod rewards;
    /// Arena state and the simulation step.
    ///
    /// [`world::World::step`] is the only place where agents, obstacles and
    /// costs change during an epoch.
    pub mod world;
}

pub use simulation::brain::Network;
pub use simulation::error::{ChampionError, NetworkError, ParamsError, SimulationError};
pub use simulation::evolution::{Evolution, Phase, Termination};
pub use simulation::params::Params;
pub use simulation::renderer::{HeadlessRenderer, Renderer};
