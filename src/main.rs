use std::path::Path;

use macroquad::prelude::*;
use neuroarena::simulation::evolution::{Evolution, Phase};
use neuroarena::simulation::params::Params;
use tracing::{error, info, warn};

mod ui;

const CONFIG_PATH: &str = "neuroarena.json";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_params() -> Params {
    if !Path::new(CONFIG_PATH).exists() {
        info!("no {} found, using default parameters", CONFIG_PATH);
        return Params::default();
    }
    match Params::load_from_file(CONFIG_PATH) {
        Ok(params) => {
            info!("loaded parameters from {}", CONFIG_PATH);
            params
        }
        Err(e) => {
            warn!(error = %e, "could not load {}, using default parameters", CONFIG_PATH);
            Params::default()
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Neuroarena".to_owned(),
        window_width: 1200,
        window_height: 900,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let params = load_params();
    let mut renderer = ui::MacroquadRenderer::new(params.clone());
    let mut evolution = match Evolution::new(params) {
        Ok(evolution) => evolution,
        Err(e) => {
            error!(error = %e, "cannot start evolution");
            return;
        }
    };

    loop {
        match evolution.advance_frame(&mut renderer) {
            Ok(Phase::Terminated(reason)) => {
                info!(?reason, epochs = evolution.epoch(), "stopped");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "evolution aborted");
                break;
            }
        }

        ui::draw_ui(&mut renderer, &mut evolution);
        ui::process_egui();

        next_frame().await;
    }
}
