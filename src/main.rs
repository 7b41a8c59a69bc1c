mod app;
mod camera;
mod config;
mod focus;
mod graph;
mod sim;
mod tree;
mod util;

use clap::Parser;

use config::{Args, ExplorerConfig};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ExplorerConfig::from(Args::parse());
    log::info!("exploring {}", config.tree_path.display());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "cre-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, config)))),
    )
}
