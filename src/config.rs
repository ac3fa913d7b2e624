// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from `framelabel.yaml` in the working directory. The
//! file is optional and every field falls back to its default.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "framelabel.yaml";

/// Tunables of the annotation canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel notch.
    pub zoom_step: f64,
    /// Rectangles narrower or shorter than this (image pixels) are discarded.
    pub min_rect_size: i32,
    /// Side of the square resize handle, in view pixels.
    pub handle_size: f64,
    /// Side of the square hit region around a point annotation, in image pixels.
    pub point_hit_size: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            zoom_step: 0.1,
            min_rect_size: 5,
            handle_size: 8.0,
            point_hit_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `projects.json`, the project files and annotations.
    pub data_dir: PathBuf,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            canvas: CanvasConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.canvas.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

impl CanvasConfig {
    fn validate(&self) -> Result<()> {
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            bail!(
                "Scale range must satisfy 0 < min_scale <= max_scale (got {}..{})",
                self.min_scale,
                self.max_scale
            );
        }
        if self.zoom_step <= 0.0 {
            bail!("zoom_step must be positive (got {})", self.zoom_step);
        }
        if self.min_rect_size < 0 || self.point_hit_size <= 0 || self.handle_size <= 0.0 {
            bail!("Size thresholds must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "data_dir: /srv/frames\ncanvas:\n  max_scale: 5.0\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/frames"));
        assert_eq!(config.canvas.max_scale, 5.0);
        assert_eq!(config.canvas.min_rect_size, 5);
    }

    #[test]
    fn test_invalid_scale_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "canvas:\n  min_scale: 2.0\n  max_scale: 1.0\n").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }
}
