mod analysis;
mod app;
mod color;
mod controller;
mod data;
mod error;
mod settings;
mod state;
mod ui;

use anyhow::{Context, anyhow};
use app::RustyPcaApp;
use eframe::egui;

use crate::analysis::client::HttpAnalysisService;
use crate::controller::{ControllerOptions, UploadController};
use crate::settings::Settings;
use crate::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load()?;
    let endpoint = settings.endpoint_url()?;
    log::info!(
        "Analysis endpoint {endpoint} (timeout {:?}, variance order {:?})",
        settings.timeout(),
        settings.variance_order
    );

    let service = HttpAnalysisService::new(endpoint, settings.timeout())
        .context("setting up the analysis client")?;
    let controller = UploadController::new(
        service,
        ControllerOptions {
            deadline: settings.timeout(),
            variance_order: settings.variance_order,
        },
    );
    let state = AppState::new(settings.base_url()?);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty PCA – Analysis Client",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can fetch and render the plots.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RustyPcaApp::new(state, controller)))
        }),
    )
    .map_err(|e| anyhow!("running the UI: {e}"))
}
