// UI module - arena drawing and egui panels

mod nn;
mod renderer;
mod stats;

use egui_macroquad::egui;
use macroquad::input::{MouseButton, is_mouse_button_pressed, mouse_position};
use neuroarena::simulation::evolution::Evolution;

pub use renderer::MacroquadRenderer;

pub fn draw_ui(renderer: &mut MacroquadRenderer, evolution: &mut Evolution) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        // clicks over egui windows belong to egui
        if !egui_ctx.wants_pointer_input() && is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            if let Some(id) = renderer.agent_at(evolution.world(), x, y) {
                evolution.set_inspected(Some(id));
            }
        }

        stats::draw_evolution_window(egui_ctx, evolution);

        egui::Window::new("Network")
            .default_pos(egui::pos2(10.0, 360.0))
            .show(egui_ctx, |ui| {
                ui.checkbox(&mut renderer.show_rays, "Show rays");
                if let Some(agent) = evolution.inspected_agent() {
                    ui.label(format!(
                        "Agent {}: health={} cost={:.2}",
                        agent.id, agent.health, agent.cost
                    ));
                }
                match renderer.network() {
                    Some(network) => nn::draw_network(ui, network, evolution.params()),
                    None => {
                        ui.label("No agent inspected");
                    }
                }
            });
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
