// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User-facing canvas errors.
//!
//! None of these are fatal: the application shows them in a message
//! window and the session continues.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Select a subproject first")]
    NoSubproject,

    #[error("This subproject has no classes to annotate with")]
    NoClasses,

    #[error("No image is loaded")]
    NoImageLoaded,

    #[error("There are no annotations to save")]
    NothingToSave,

    #[error("File not found: {}", .0.display())]
    ImageMissing(PathBuf),

    #[error("Failed to load image {}: {reason}", .path.display())]
    ImageUnreadable { path: PathBuf, reason: String },

    #[error("Failed to save annotations: {0:#}")]
    Persistence(anyhow::Error),
}
