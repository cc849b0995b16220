use geo::{Coord, coord};
use macroquad::prelude::*;
use neuroarena::simulation::agent::Agent;
use neuroarena::simulation::brain::Network;
use neuroarena::simulation::obstacle::Obstacle;
use neuroarena::simulation::params::Params;
use neuroarena::simulation::renderer::Renderer;
use neuroarena::simulation::world::World;

const AGENT_COLOR: Color = Color { r: 0.35, g: 0.6, b: 1.0, a: 1.0 };
const HEADING_COLOR: Color = Color { r: 1.0, g: 0.85, b: 0.2, a: 1.0 };
const RAY_COLOR: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.15 };
const OBSTACLE_COLOR: Color = Color { r: 1.0, g: 0.35, b: 0.35, a: 1.0 };

/// Arena-to-screen transform, fitted to the current window.
#[derive(Clone, Copy)]
struct Viewport {
    scale: f32,
}

impl Viewport {
    fn fit(params: &Params) -> Self {
        let scale_x = screen_width() / params.arena_width;
        let scale_y = screen_height() / params.arena_height;
        Self {
            scale: scale_x.min(scale_y),
        }
    }

    fn point(self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale, y * self.scale)
    }

    fn length(self, value: f32) -> f32 {
        value * self.scale
    }

    fn to_arena(self, x: f32, y: f32) -> Coord<f32> {
        coord! { x: x / self.scale, y: y / self.scale }
    }
}

/// Draws the arena with macroquad and latches the `Escape` key as quit.
pub struct MacroquadRenderer {
    params: Params,
    quit: bool,
    network: Option<Network>,
    pub show_rays: bool,
}

impl MacroquadRenderer {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            quit: false,
            network: None,
            show_rays: true,
        }
    }

    /// Network of the inspected agent as of the last tick.
    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    /// Agent under the screen position `(x, y)`, if any.
    pub fn agent_at(&self, world: &World, x: f32, y: f32) -> Option<usize> {
        let point = Viewport::fit(&self.params).to_arena(x, y);
        world.agent_at(point, self.params.agent_size)
    }

    fn draw_agent(&self, agent: &Agent, view: Viewport) {
        let size = view.length(self.params.agent_size);
        let (x, y) = view.point(agent.pos.x, agent.pos.y);

        if self.show_rays {
            let reach = view.length(self.params.max_ray_distance());
            for ray in &agent.rays {
                let dir = ray.direction();
                draw_line(x, y, x + dir.x * reach, y + dir.y * reach, 1.0, RAY_COLOR);
            }
        }

        draw_rectangle_lines(x - size / 2.0, y - size / 2.0, size, size, 2.0, AGENT_COLOR);

        let rad = agent.direction.to_radians();
        draw_line(
            x,
            y,
            x + rad.cos() * size,
            y - rad.sin() * size,
            2.0,
            HEADING_COLOR,
        );
    }
}

impl Renderer for MacroquadRenderer {
    fn present(&mut self, agents: &[Agent], obstacles: &[Obstacle]) {
        clear_background(Color::from_rgba(20, 20, 28, 255));
        let view = Viewport::fit(&self.params);

        let (w, h) = view.point(self.params.arena_width, self.params.arena_height);
        draw_rectangle_lines(0.0, 0.0, w, h, 1.0, DARKGRAY);

        for agent in agents {
            self.draw_agent(agent, view);
        }

        let size = view.length(self.params.projectile_size);
        for obstacle in obstacles {
            let (x, y) = view.point(obstacle.pos.x, obstacle.pos.y);
            draw_rectangle(x - size / 2.0, y - size / 2.0, size, size, OBSTACLE_COLOR);
        }
    }

    fn poll_quit(&mut self) -> bool {
        if is_key_pressed(KeyCode::Escape) {
            self.quit = true;
        }
        self.quit
    }

    fn show_network(&mut self, network: &Network) {
        match &mut self.network {
            Some(shown) => shown.clone_from(network),
            None => self.network = Some(network.clone()),
        }
    }
}
