use std::path::PathBuf;

use anyhow::Context;
use log::info;
use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod assets;
mod camera;
mod error;
mod renderer;
mod scene;
mod settings;
mod ui;

/// Name under which confy stores the per-window settings files.
pub const CONFY_APP_NAME: &str = "cafevis-rs";

const DEFAULT_ASSET_DIR: &str = "assets";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let asset_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));
    info!("Loading scene assets from {}", asset_dir.display());

    let event_loop = EventLoop::new().context("creating the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let runtime = tokio::runtime::Runtime::new().context("starting the tokio runtime")?;
    let mut handler = app::AppHandler::new(asset_dir, runtime);
    event_loop
        .run_app(&mut handler)
        .context("running the event loop")?;

    if let Some(err) = handler.error.take() {
        return Err(anyhow::Error::new(err).context("viewer startup failed"));
    }
    Ok(())
}
