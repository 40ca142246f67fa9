mod app;
mod config;
mod domain;
mod infra;
mod logging;
mod ui;
mod usecase;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use tracing::{error, info};

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview data directory: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "demand-planner", "DemandPlanner")
        .ok_or_else(|| anyhow!("unable to resolve app data directory"))?;
    ensure_webview_data_dir(dirs.data_local_dir())
}

fn main() {
    logging::init();

    let mut desktop_config = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Demand Planner"));
    match default_webview_data_dir() {
        Ok(dir) => {
            info!(dir = %dir.display(), "using webview data directory");
            desktop_config = desktop_config.with_data_directory(dir);
        }
        Err(err) => error!("falling back to default webview data directory: {err:#}"),
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .launch(app::App);
}

#[cfg(test)]
mod tests;
