// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The annotation canvas.
//!
//! [`AnnotationCanvas`] is independent of the windowing toolkit: the host
//! feeds it view-space pointer events and a widget size, and paints the
//! [`render::DrawCommand`]s it produces.

pub mod interaction;
pub mod render;
pub mod shapes;
pub mod viewport;

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::io::{media, serialization};
use crate::models::annotation::Annotation;
use crate::models::project::ActiveContext;
use image::RgbaImage;
use interaction::{InteractionState, Selection, ToolState};
use shapes::ShapeModel;
use std::path::{Path, PathBuf};
use viewport::Viewport;

pub struct AnnotationCanvas {
    config: CanvasConfig,
    context: ActiveContext,
    /// Position of the displayed image in `context.image_files`.
    image_index: usize,
    viewport: Viewport,
    shapes: ShapeModel,
    selection: Selection,
    tool: ToolState,
    state: InteractionState,
}

impl AnnotationCanvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            viewport: Viewport::new(&config),
            shapes: ShapeModel::new(config.min_rect_size),
            config,
            context: ActiveContext::default(),
            image_index: 0,
            selection: Selection::default(),
            tool: ToolState::Disarmed,
            state: InteractionState::Idle,
        }
    }

    // --- Context and navigation ---

    /// Adopt a new upstream selection.
    ///
    /// Switching to another folder or subproject drops unsaved annotations
    /// and shows the first image. A change that only touches the class list
    /// keeps everything, disarming a tool whose class disappeared.
    pub fn on_context_changed(&mut self, context: ActiveContext) -> Result<(), CanvasError> {
        let folder_changed = context.project != self.context.project
            || context.subproject != self.context.subproject
            || context.image_files != self.context.image_files;

        if !folder_changed {
            let stale = self
                .tool
                .armed()
                .is_some_and(|(_, class)| !context.classes.contains(class));
            if stale {
                self.cancel_tool();
            }
            self.context = context;
            return Ok(());
        }

        if !self.shapes.is_empty() {
            log::warn!("Discarding {} unsaved annotations", self.shapes.len());
        }
        log::info!(
            "Context {}/{} with {} images",
            context.project,
            context.subproject,
            context.image_files.len()
        );

        self.context = context;
        self.shapes.clear();
        self.cancel_tool();
        self.selection = Selection::default();
        self.image_index = 0;

        if self.context.image_files.is_empty() {
            self.viewport.clear_image();
            return Ok(());
        }
        self.show_image(0)
    }

    pub fn context(&self) -> &ActiveContext {
        &self.context
    }

    /// Display image `index` of the folder with a fresh view.
    ///
    /// Annotations already drawn stay in memory. On failure no image is
    /// displayed until the next successful load.
    pub fn show_image(&mut self, index: usize) -> Result<(), CanvasError> {
        let Some(path) = self.context.image_files.get(index).cloned() else {
            return Err(CanvasError::NoImageLoaded);
        };

        match media::load_image(&path) {
            Ok(bitmap) => {
                self.display(index, bitmap);
                Ok(())
            }
            Err(err) => {
                log::error!("{}", err);
                self.image_index = index;
                self.reset_interaction();
                self.viewport.clear_image();
                Err(err)
            }
        }
    }

    /// Step forward. Returns `false` at the last image.
    pub fn next_image(&mut self) -> Result<bool, CanvasError> {
        if self.image_index + 1 >= self.context.image_files.len() {
            return Ok(false);
        }
        self.show_image(self.image_index + 1).map(|_| true)
    }

    /// Step back. Returns `false` at the first image.
    pub fn prev_image(&mut self) -> Result<bool, CanvasError> {
        if self.image_index == 0 || self.context.image_files.is_empty() {
            return Ok(false);
        }
        self.show_image(self.image_index - 1).map(|_| true)
    }

    /// `"current/total"`, or `"0/0"` for an empty folder.
    pub fn counter(&self) -> String {
        match self.context.image_files.len() {
            0 => "0/0".to_string(),
            total => format!("{}/{}", self.image_index + 1, total),
        }
    }

    /// Path of the image annotations are currently attached to.
    pub fn active_image_path(&self) -> Option<&Path> {
        if !self.viewport.has_image() {
            return None;
        }
        self.context.image_files.get(self.image_index).map(PathBuf::as_path)
    }

    // --- View ---

    pub fn set_view_size(&mut self, width: i32, height: i32) {
        self.viewport.set_view_size(width, height);
    }

    pub fn reset_view(&mut self) {
        self.viewport.fit_to_view();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // --- Annotations ---

    pub fn annotations(&self) -> &[Annotation] {
        self.shapes.as_slice()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    /// Remove the selected annotation.
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection.selected else {
            return false;
        };
        self.reset_interaction();
        match self.shapes.remove(index) {
            Some(removed) => {
                log::info!("Deleted {:?} annotation {}", removed.shape.kind(), index);
                true
            }
            None => false,
        }
    }

    /// Write every in-memory annotation to the subproject's annotation
    /// directory and clear the in-memory list.
    pub fn save(&mut self) -> Result<Vec<PathBuf>, CanvasError> {
        if self.shapes.is_empty() {
            return Err(CanvasError::NothingToSave);
        }

        let written = serialization::save_annotations(self.shapes.as_slice(), &self.context.annotations_dir)
            .map_err(CanvasError::Persistence)?;

        let mut saved_images: Vec<PathBuf> = self.shapes.as_slice().iter().map(|a| a.image_path.clone()).collect();
        saved_images.sort();
        saved_images.dedup();

        let mut flushed = 0;
        for image_path in &saved_images {
            flushed += self.shapes.remove_all_for_image(image_path);
        }
        log::info!(
            "Saved {} annotations to {} files in {}",
            flushed,
            written.len(),
            self.context.annotations_dir.display()
        );
        self.selection = Selection::default();
        self.discard_gesture();
        Ok(written)
    }

    fn display(&mut self, index: usize, bitmap: RgbaImage) {
        self.image_index = index;
        self.reset_interaction();
        self.viewport.set_image(bitmap);
        log::debug!("Showing image {}", self.counter());
    }

    /// Forget the selection and any gesture, keeping an armed tool armed.
    fn reset_interaction(&mut self) {
        self.selection = Selection::default();
        self.state = InteractionState::Idle;
    }
}
