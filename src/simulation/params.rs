//! Simulation parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ParamsError;

/// Number of network outputs: throttle, heading target, fire flag.
pub const OUTPUT_WIDTH: usize = 3;

/// Number of proprioceptive inputs appended after the ray distances.
pub const PROPRIOCEPTIVE_INPUTS: usize = 2;

/// Axis-aligned region that rewards agents standing inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRegion {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width of the region.
    pub width: f32,
    /// Height of the region.
    pub height: f32,
}

impl GoalRegion {
    /// Returns `true` if the point lies inside the region (edges inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Simulation parameters that control arena physics, rewards and evolution.
///
/// Every field has a default, so a configuration file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Arena width.
    pub arena_width: f32,
    /// Arena height.
    pub arena_height: f32,
    /// Side length of the square agent hitbox.
    pub agent_size: f32,
    /// Agents spawned per epoch.
    pub population: usize,
    /// Number of perception rays per agent.
    pub num_rays: usize,
    /// Angular width of the ray fan in degrees.
    pub fov: f32,
    /// Neural network layer widths, input first.
    pub layer_sizes: Vec<usize>,
    /// Maximum forward speed in arena units per second.
    pub max_speed: f32,
    /// Maximum turn rate in degrees per tick.
    pub max_angular_velocity: f32,
    /// Fraction of the respective maximum below which motion snaps to zero.
    pub deadzone: f32,
    /// Lower bound for the tick delta in seconds.
    pub min_dt: f32,
    /// Constant tick delta; `None` measures wall-clock time.
    pub fixed_dt: Option<f32>,
    /// Hit points of a freshly spawned agent.
    pub initial_health: i32,
    /// Seconds between two shots.
    pub fire_cooldown: f32,
    /// Projectile speed in arena units per second.
    pub projectile_speed: f32,
    /// Side length of the square projectile hitbox.
    pub projectile_size: f32,
    /// Cost charged to an agent for every shot.
    pub fire_cost: f32,
    /// Cost charged to an agent hit by a projectile.
    pub hit_cost: f32,
    /// Cost added to the shooter on a hit (negative rewards the shooter).
    pub hit_reward: f32,
    /// Weight of the heading-divergence bonus.
    pub novelty_weight: f32,
    /// Weight of the nearest-neighbour proximity bonus.
    pub proximity_weight: f32,
    /// Distance beyond which the proximity bonus is zero.
    pub proximity_radius: f32,
    /// Optional region rewarding agents inside it.
    pub goal_region: Option<GoalRegion>,
    /// Cost removed per second spent inside the goal region.
    pub goal_reward: f32,
    /// Half-width of the uniform noise added to ray inputs.
    pub input_noise: f32,
    /// Ticks per epoch.
    pub epoch_length: u32,
    /// Number of epochs before the loop terminates; `None` runs until cancelled.
    pub max_epochs: Option<u32>,
    /// Fraction of the population cloned from survivors.
    pub clone_fraction: f32,
    /// Number of top-ranked survivors eligible for cloning.
    pub survivor_pool_size: usize,
    /// Probability that a spawned agent is mutated.
    pub mutation_probability: f32,
    /// Half-width of the uniform mutation applied to weights and biases.
    pub mutation_amount: f32,
    /// Pause between epochs in milliseconds.
    pub epoch_pause_ms: u64,
    /// Seed for the shared random source; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// File holding the best network of the last completed epoch.
    pub champion_path: PathBuf,
    /// File receiving the per-epoch history as JSON.
    pub history_path: Option<PathBuf>,
}

impl Default for Params {
    fn default() -> Self {
        let num_rays = 5;
        Self {
            arena_width: 500.0,
            arena_height: 500.0,
            agent_size: 15.0,
            population: 20,
            num_rays,
            fov: 90.0,
            layer_sizes: vec![num_rays + PROPRIOCEPTIVE_INPUTS, 8, OUTPUT_WIDTH],
            max_speed: 150.0,
            max_angular_velocity: 5.0,
            deadzone: 0.02,
            min_dt: 0.001,
            fixed_dt: None,
            initial_health: 3,
            fire_cooldown: 1.0,
            projectile_speed: 300.0,
            projectile_size: 4.0,
            fire_cost: 1.0,
            hit_cost: 10.0,
            hit_reward: -10.0,
            novelty_weight: 0.0,
            proximity_weight: 0.0,
            proximity_radius: 100.0,
            goal_region: None,
            goal_reward: 1.0,
            input_noise: 0.0,
            epoch_length: 2000,
            max_epochs: None,
            clone_fraction: 0.5,
            survivor_pool_size: 5,
            mutation_probability: 0.8,
            mutation_amount: 0.1,
            epoch_pause_ms: 0,
            seed: None,
            champion_path: PathBuf::from("champion.txt"),
            history_path: None,
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Length of the diagonal used to normalise ray distances.
    pub fn max_ray_distance(&self) -> f32 {
        self.arena_width * std::f32::consts::SQRT_2
    }

    /// Checks that the topology matches the sensors and actuators and that
    /// every rate is in range.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let invalid = |msg: String| Err(ParamsError::Invalid(msg));

        if self.layer_sizes.len() < 2 {
            return invalid("layer_sizes needs at least an input and an output layer".into());
        }
        if let Some(i) = self.layer_sizes.iter().position(|&w| w == 0) {
            return invalid(format!("layer {i} has no neurons"));
        }
        let expected_inputs = self.num_rays + PROPRIOCEPTIVE_INPUTS;
        if self.layer_sizes[0] != expected_inputs {
            return invalid(format!(
                "input layer has {} neurons, {} rays need {}",
                self.layer_sizes[0], self.num_rays, expected_inputs
            ));
        }
        if self.layer_sizes[self.layer_sizes.len() - 1] != OUTPUT_WIDTH {
            return invalid(format!("output layer must have {OUTPUT_WIDTH} neurons"));
        }
        if self.num_rays == 0 {
            return invalid("num_rays must be positive".into());
        }
        if self.population == 0 {
            return invalid("population must be positive".into());
        }
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return invalid("arena dimensions must be positive".into());
        }
        if self.epoch_length == 0 {
            return invalid("epoch_length must be positive".into());
        }
        if !(self.min_dt > 0.0) {
            return invalid("min_dt must be positive".into());
        }
        if let Some(dt) = self.fixed_dt {
            if !(dt > 0.0) {
                return invalid("fixed_dt must be positive".into());
            }
        }
        for (name, value) in [
            ("clone_fraction", self.clone_fraction),
            ("mutation_probability", self.mutation_probability),
            ("deadzone", self.deadzone),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must lie in [0, 1], got {value}"));
            }
        }
        if self.mutation_amount < 0.0 || self.input_noise < 0.0 {
            return invalid("mutation_amount and input_noise must not be negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn topology_must_match_ray_count() {
        let params = Params {
            num_rays: 3,
            ..Params::default()
        };
        assert!(matches!(params.validate(), Err(ParamsError::Invalid(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: Params = serde_json::from_str(r#"{ "population": 4 }"#).unwrap();
        assert_eq!(params.population, 4);
        assert_eq!(params.num_rays, Params::default().num_rays);
    }

    #[test]
    fn goal_region_contains_edges() {
        let goal = GoalRegion {
            x: 10.0,
            y: 10.0,
            width: 5.0,
            height: 5.0,
        };
        assert!(goal.contains(10.0, 15.0));
        assert!(!goal.contains(9.9, 12.0));
    }
}
