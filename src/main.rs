use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use penguin_explorer::app::PenguinApp;
use penguin_explorer::config::{Settings, WINDOW_TITLE};

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_env();
    let dataset = settings.load_dataset().inspect_err(|e| {
        log::error!("Failed to load dataset: {e:#}");
    })?;
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(settings.inner_size)
            .with_min_inner_size(settings.min_inner_size),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the UI")
}
