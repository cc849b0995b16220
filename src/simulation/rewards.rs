//! Global reward shaping applied after every agent has moved.
//!
//! All bonuses are rates: they are scaled by the tick delta and subtracted
//! from each agent's cost. They depend only on the agent states of the
//! current tick.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};
use tracing::warn;

use super::agent::Agent;
use super::params::Params;

type Tree2D = KdTree<f32, usize, [f32; 2]>;

/// Applies the novelty, proximity and goal-region bonuses.
pub fn apply_shaping(agents: &mut [Agent], params: &Params, dt: f32) {
    if params.novelty_weight != 0.0 {
        let bonuses = novelty_bonuses(agents);
        for (agent, bonus) in agents.iter_mut().zip(bonuses) {
            agent.cost -= params.novelty_weight * bonus * dt;
        }
    }

    if params.proximity_weight != 0.0 {
        match proximity_bonuses(agents, params.proximity_radius) {
            Ok(bonuses) => {
                for (agent, bonus) in agents.iter_mut().zip(bonuses) {
                    agent.cost -= params.proximity_weight * bonus * dt;
                }
            }
            Err(e) => warn!("skipping proximity bonus: {e:?}"),
        }
    }

    if let Some(goal) = params.goal_region {
        for agent in agents.iter_mut().filter(|a| goal.contains(a.pos.x, a.pos.y)) {
            agent.cost -= params.goal_reward * dt;
        }
    }
}

/// Mean heading divergence of every agent from all others, in `[0, 1]`.
pub fn novelty_bonuses(agents: &[Agent]) -> Vec<f32> {
    let n = agents.len();
    if n < 2 {
        return vec![0.0; n];
    }
    agents
        .iter()
        .map(|a| {
            let total: f32 = agents
                .iter()
                .filter(|b| b.id != a.id)
                .map(|b| heading_divergence(a.direction, b.direction))
                .sum();
            total / (n - 1) as f32
        })
        .collect()
}

/// Closeness to the nearest other agent, `1 - d / radius` clamped to `[0, 1]`.
pub fn proximity_bonuses(agents: &[Agent], radius: f32) -> Result<Vec<f32>, KdTreeError> {
    if agents.len() < 2 || radius <= 0.0 {
        return Ok(vec![0.0; agents.len()]);
    }

    let mut tree: Tree2D = KdTree::with_capacity(2, agents.len());
    for (i, agent) in agents.iter().enumerate() {
        tree.add([agent.pos.x, agent.pos.y], i)?;
    }

    agents
        .iter()
        .enumerate()
        .map(|(i, agent)| -> Result<f32, KdTreeError> {
            let nearest = tree.nearest(&[agent.pos.x, agent.pos.y], 2, &squared_euclidean)?;
            let distance = nearest
                .iter()
                .find(|(_, idx)| **idx != i)
                .map_or(f32::INFINITY, |(d2, _)| d2.sqrt());
            Ok((1.0 - distance / radius).clamp(0.0, 1.0))
        })
        .collect()
}

/// Smallest angle between two headings, scaled to `[0, 1]`.
fn heading_divergence(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff) / 180.0
}
