mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::GalleryApp;
use config::GalleryConfig;
use data::loader::GalleryLoader;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = GalleryConfig::from_env().context("loading configuration")?;
    let loader = GalleryLoader::new(config.request_timeout(), config.use_proxy)
        .context("building HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trending Gallery",
        options,
        Box::new(|_cc| Ok(Box::new(GalleryApp::new(config, loader)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
