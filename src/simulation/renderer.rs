//! Interface to the presentation layer.
//!
//! The evolution loop only ever talks to a [`Renderer`]: it hands over the
//! current state once per tick and asks whether the operator wants to quit.

use super::agent::Agent;
use super::brain::Network;
use super::obstacle::Obstacle;

/// Passive presentation collaborator driven by the evolution loop.
pub trait Renderer {
    /// Draws the current state.
    fn present(&mut self, agents: &[Agent], obstacles: &[Obstacle]);

    /// Returns `true` once the operator has asked to stop.
    fn poll_quit(&mut self) -> bool;

    /// Receives the network of the inspected agent once per tick.
    fn show_network(&mut self, _network: &Network) {}
}

/// Renderer that draws nothing and never quits; used for batch runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessRenderer;

impl Renderer for HeadlessRenderer {
    fn present(&mut self, _agents: &[Agent], _obstacles: &[Obstacle]) {}

    fn poll_quit(&mut self) -> bool {
        false
    }
}
