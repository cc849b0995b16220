use egui_macroquad::egui;
use neuroarena::simulation::brain::Network;
use neuroarena::simulation::params::Params;

const MAX_CONNECTIONS: usize = 200;

pub(super) fn input_label(index: usize, params: &Params) -> Option<String> {
    if index < params.num_rays {
        Some(format!("Ray {}", index))
    } else {
        match index - params.num_rays {
            0 => Some("Speed".to_owned()),
            1 => Some("Turn".to_owned()),
            _ => None,
        }
    }
}

pub(super) fn output_label(index: usize) -> Option<&'static str> {
    match index {
        0 => Some("Throttle"),
        1 => Some("Heading"),
        2 => Some("Fire"),
        _ => None,
    }
}

/// Draws every layer with the activations of the last forward pass.
pub(super) fn draw_network(ui: &mut egui::Ui, network: &Network, params: &Params) {
    let layers = network.layers();
    let layer_count = layers.len();
    if layer_count == 0 {
        ui.label("No layers to display");
        return;
    }

    let (response, painter) =
        ui.allocate_painter(egui::vec2(420.0, 320.0), egui::Sense::hover());
    let rect = response.rect;
    let layer_spacing = rect.width() / (layer_count as f32 + 1.0);

    let neuron_pos = |layer_idx: usize, neuron_idx: usize, count: usize| {
        egui::pos2(
            rect.left() + layer_spacing * (layer_idx + 1) as f32,
            rect.top() + rect.height() * (neuron_idx as f32 + 1.0) / (count as f32 + 1.0),
        )
    };

    // connections first so neurons are drawn on top
    for (layer_idx, pair) in layers.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let draw_all = from.len() * to.len() <= MAX_CONNECTIONS;

        for in_idx in 0..from.len() {
            for out_idx in 0..to.len() {
                if !draw_all && (in_idx + out_idx) % 5 != 0 {
                    continue;
                }

                let weight = from.weights[[in_idx, out_idx]];
                let signal = from.values[in_idx] * weight;
                let strength = signal.abs().min(1.0);
                let alpha = ((weight.abs().min(1.0) * 120.0) as u8).max((strength * 200.0) as u8);
                let intensity = (strength * 255.0) as u8;

                let color = if signal > 0.0 {
                    egui::Color32::from_rgba_unmultiplied(0, intensity, 50, alpha)
                } else if signal < 0.0 {
                    egui::Color32::from_rgba_unmultiplied(intensity, 0, 50, alpha)
                } else {
                    egui::Color32::from_rgba_unmultiplied(150, 150, 150, alpha)
                };

                painter.line_segment(
                    [
                        neuron_pos(layer_idx, in_idx, from.len()),
                        neuron_pos(layer_idx + 1, out_idx, to.len()),
                    ],
                    egui::Stroke::new(0.8 + strength * 2.5, color),
                );
            }
        }
    }

    for (layer_idx, layer) in layers.iter().enumerate() {
        let is_input = layer_idx == 0;
        let is_output = layer_idx == layer_count - 1;

        for (neuron_idx, &value) in layer.values.iter().enumerate() {
            let pos = neuron_pos(layer_idx, neuron_idx, layer.len());

            // sigmoid output lives in [0, 1]
            let intensity = (value.clamp(0.0, 1.0) * 255.0) as u8;
            painter.circle_filled(pos, 5.0, egui::Color32::from_rgb(255, intensity, 0));
            painter.circle_stroke(pos, 5.0, egui::Stroke::new(1.5, egui::Color32::WHITE));

            let label = if is_input {
                input_label(neuron_idx, params)
            } else if is_output {
                output_label(neuron_idx).map(str::to_owned)
            } else {
                None
            };

            if let Some(text) = label {
                let (offset, align) = if is_input {
                    (-12.0, egui::Align2::RIGHT_CENTER)
                } else {
                    (12.0, egui::Align2::LEFT_CENTER)
                };
                painter.text(
                    egui::pos2(pos.x + offset, pos.y),
                    align,
                    text,
                    egui::FontId::proportional(9.0),
                    egui::Color32::WHITE,
                );
            }
        }

        let name = if is_input {
            "Input"
        } else if is_output {
            "Output"
        } else {
            "Hidden"
        };
        painter.text(
            egui::pos2(
                rect.left() + layer_spacing * (layer_idx + 1) as f32,
                rect.bottom() + 5.0,
            ),
            egui::Align2::CENTER_TOP,
            name,
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );
    }
}
