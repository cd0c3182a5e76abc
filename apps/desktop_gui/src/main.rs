use std::path::PathBuf;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::StoreBridge;
use controller::BookController;
use ui::BookshelfApp;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Desktop book inventory manager")]
struct Args {
    /// TOML settings file; defaults to ./bookshelf.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// SQLite database URL or file path.
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let database_url = config::normalize_database_url(&settings.database_url);
    tracing::info!(%database_url, "opening book inventory");
    let bridge = StoreBridge::open(&database_url).inspect_err(|err| {
        tracing::error!("failed to open book inventory: {err:#}");
    })?;
    let app = BookshelfApp::new(BookController::new(bridge));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&settings.window_title)
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        &settings.window_title,
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("desktop gui exited with an error")
}
