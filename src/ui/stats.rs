use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use neuroarena::simulation::evolution::{Evolution, Phase};

pub(super) fn draw_evolution_window(egui_ctx: &egui::Context, evolution: &Evolution) {
    egui::Window::new("Evolution")
        .default_pos(egui::pos2(10.0, 10.0))
        .default_width(320.0)
        .show(egui_ctx, |ui| {
            let world = evolution.world();
            let params = evolution.params();

            ui.label(format!("Epoch: {}", evolution.epoch()));
            ui.label(format!(
                "Tick: {}/{}",
                world.ticks, params.epoch_length
            ));
            ui.label(format!("Time: {:.1}s", world.time));
            ui.label(format!(
                "Agents: {}/{}",
                world.agents.len(),
                params.population
            ));
            ui.label(format!("Obstacles: {}", world.obstacles.len()));
            if let Phase::Terminated(reason) = evolution.phase() {
                ui.label(format!("Stopped: {:?}", reason));
            }

            if let Some(last) = evolution.history().last() {
                ui.separator();
                match (last.best_cost, last.mean_cost) {
                    (Some(best), Some(mean)) => ui.label(format!(
                        "Last epoch: best={:.2} mean={:.2} survivors={}",
                        best, mean, last.survivors
                    )),
                    _ => ui.label("Last epoch: no survivors"),
                };
                let seconds = (last.finished_at - last.started_at).num_milliseconds() as f64 / 1000.0;
                ui.label(format!("Duration: {:.1}s", seconds));
            }

            ui.separator();
            ui.heading("Cost Per Epoch");
            draw_cost_plot(ui, evolution);
        });
}

fn draw_cost_plot(ui: &mut egui::Ui, evolution: &Evolution) {
    let epochs = &evolution.history().epochs;
    if epochs.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let best: PlotPoints = epochs
        .iter()
        .filter_map(|e| e.best_cost.map(|c| [e.epoch as f64, c as f64]))
        .collect();
    let mean: PlotPoints = epochs
        .iter()
        .filter_map(|e| e.mean_cost.map(|c| [e.epoch as f64, c as f64]))
        .collect();

    Plot::new("cost_plot")
        .height(180.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nEpoch: {:.0}\nCost: {:.2}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(100, 200, 100))
                    .name("Best"),
            );
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}
