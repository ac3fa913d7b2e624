// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! framelabel - frame annotation tool
//!
//! A cross-platform desktop application for marking rectangles, polygons
//! and points on the image frames of a labeling project.

mod app;
mod canvas;
mod config;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::FramelabelApp;
use config::{AppConfig, CONFIG_FILE};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::error!("{:#}; using default configuration", e);
        AppConfig::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("framelabel"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "framelabel",
        options,
        Box::new(|_cc| Ok(Box::new(FramelabelApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
