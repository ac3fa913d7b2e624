// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the workspace selection, hands the active
//! context to the annotation canvas and turns canvas errors into messages.

use crate::canvas::interaction::{Action, Tool, ToolState};
use crate::canvas::viewport::Zoom;
use crate::canvas::AnnotationCanvas;
use crate::config::AppConfig;
use crate::error::CanvasError;
use crate::io::workspace;
use crate::models::project::{ProjectData, ProjectEntry};
use crate::ui::browser::{self, BrowserAction, BrowserState};
use crate::ui::canvas::CanvasView;
use crate::ui::dialogs::{self, ClassChoice, Message};
use crate::ui::toolbar::{self, ToolbarAction};
use crate::util::geometry::ViewPoint;
use std::path::PathBuf;

/// Main application state.
pub struct FramelabelApp {
    data_dir: PathBuf,

    /// Projects listed in the workspace index
    projects: Vec<ProjectEntry>,

    /// Index of the selected project and its loaded data
    project: Option<usize>,
    project_data: Option<ProjectData>,

    subproject: Option<usize>,
    folder: Option<String>,

    canvas: AnnotationCanvas,
    view: CanvasView,

    /// Class highlighted in the class selection window
    class_choice: usize,

    /// Message waiting to be dismissed
    message: Option<Message>,

    /// Texture must be re-uploaded before the next paint
    image_changed: bool,
}

impl FramelabelApp {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            data_dir: config.data_dir,
            projects: Vec::new(),
            project: None,
            project_data: None,
            subproject: None,
            folder: None,
            canvas: AnnotationCanvas::new(config.canvas),
            view: CanvasView::default(),
            class_choice: 0,
            message: None,
            image_changed: false,
        };
        app.reload_workspace();
        app
    }

    /// Re-read the project index and drop the current selection.
    fn reload_workspace(&mut self) {
        self.projects = match workspace::load_project_index(&self.data_dir) {
            Ok(projects) => projects,
            Err(e) => {
                log::error!("{:#}", e);
                self.message = Some(Message::warning(format!("{:#}", e)));
                Vec::new()
            }
        };
        self.project = None;
        self.project_data = None;
        self.subproject = None;
        self.folder = None;

        if self.projects.is_empty() {
            self.apply_context();
        } else {
            self.select_project(0);
        }
    }

    fn select_project(&mut self, index: usize) {
        let Some(entry) = self.projects.get(index) else {
            return;
        };

        self.project = Some(index);
        self.subproject = None;
        self.folder = None;
        match workspace::load_project(&self.data_dir, &entry.name) {
            Ok(data) => {
                let has_subprojects = !data.subprojects.is_empty();
                self.project_data = Some(data);
                if has_subprojects {
                    self.select_subproject(0);
                    return;
                }
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.project_data = None;
                self.message = Some(Message::warning(format!("{:#}", e)));
            }
        }
        self.apply_context();
    }

    fn select_subproject(&mut self, index: usize) {
        self.subproject = Some(index);
        self.folder = None;
        self.apply_context();
    }

    fn select_folder(&mut self, name: String) {
        log::info!("Opening folder {}", name);
        self.folder = Some(name);
        self.apply_context();
    }

    /// Hand the current workspace selection to the canvas.
    fn apply_context(&mut self) {
        let project = self.project.and_then(|i| self.projects.get(i));
        let data = self.project_data.as_ref();
        let subproject = data.zip(self.subproject).and_then(|(d, i)| d.subprojects.get(i));

        let context = match (project, data, subproject) {
            (Some(project), Some(data), Some(subproject)) => workspace::build_context(
                &self.data_dir,
                &project.name,
                data,
                &subproject.name,
                self.folder.as_deref(),
            ),
            _ => Default::default(),
        };

        let result = self.canvas.on_context_changed(context);
        self.image_changed = true;
        self.report(result);
    }

    fn request_tool(&mut self, tool: Tool) {
        self.class_choice = 0;
        let result = self.canvas.request_tool(tool);
        self.report(result);
    }

    fn save(&mut self) {
        match self.canvas.save() {
            Ok(files) => {
                self.message = Some(Message::info(format!(
                    "Annotations saved to {} files",
                    files.len()
                )));
            }
            Err(e) => self.report::<()>(Err(e)),
        }
    }

    fn navigate(&mut self, forward: bool) {
        let result = if forward {
            self.canvas.next_image()
        } else {
            self.canvas.prev_image()
        };
        if matches!(result, Ok(true) | Err(_)) {
            self.image_changed = true;
        }
        self.report(result);
    }

    /// Zoom around the center of the canvas.
    fn zoom_center(&mut self, direction: Zoom) {
        let (width, height) = self.canvas.viewport().view_size();
        self.canvas
            .wheel(Some(direction), ViewPoint::new(width as f64 / 2.0, height as f64 / 2.0));
    }

    /// Show a canvas error to the user.
    fn report<T>(&mut self, result: Result<T, CanvasError>) {
        if let Err(e) = result {
            log::warn!("{}", e);
            self.message = Some(Message::warning(e.to_string()));
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.canvas.finalize_polygon();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.canvas.cancel_tool();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.canvas.delete_selected();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Num0)) {
            self.canvas.reset_view();
        }
    }
}

impl eframe::App for FramelabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Data Directory...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(&self.data_dir)
                            .pick_folder()
                        {
                            log::info!("Data directory {}", path.display());
                            self.data_dir = path;
                            self.reload_workspace();
                        }
                        ui.close_menu();
                    }
                    if ui.button("Reload Workspace").clicked() {
                        self.reload_workspace();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save Annotations").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_selection = self.canvas.selected().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected (Del)"))
                        .clicked()
                    {
                        self.canvas.delete_selected();
                        ui.close_menu();
                    }
                    if ui.button("Cancel Tool (Esc)").clicked() {
                        self.canvas.cancel_tool();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.zoom_center(Zoom::In);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.zoom_center(Zoom::Out);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom (Ctrl+0)").clicked() {
                        self.canvas.reset_view();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let has_images = !self.canvas.context().image_files.is_empty();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.canvas.tool(), &self.canvas.counter(), has_images)
            })
            .inner;

        match toolbar_action {
            ToolbarAction::RequestTool(tool) => self.request_tool(tool),
            ToolbarAction::Save => self.save(),
            ToolbarAction::PrevImage => self.navigate(false),
            ToolbarAction::NextImage => self.navigate(true),
            ToolbarAction::None => {}
        }

        // Workspace browser (left side)
        let browser_action = egui::SidePanel::left("browser")
            .default_width(240.0)
            .show(ctx, |ui| {
                let state = BrowserState {
                    projects: &self.projects,
                    project: self.project,
                    data: self.project_data.as_ref(),
                    subproject: self.subproject,
                    folder: self.folder.as_deref(),
                };
                browser::show(ui, &state)
            })
            .inner;

        match browser_action {
            BrowserAction::SelectProject(index) => self.select_project(index),
            BrowserAction::SelectSubproject(index) => self.select_subproject(index),
            BrowserAction::SelectFolder(name) => self.select_folder(name),
            BrowserAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let context = self.canvas.context();
                if context.has_subproject() {
                    ui.label(format!("{} / {}", context.project, context.subproject));
                    ui.separator();
                }
                if let Some(path) = self.canvas.active_image_path() {
                    ui.label(path.display().to_string());
                    ui.separator();
                }
                ui.label(format!("Zoom {:.0}%", self.canvas.viewport().scale() * 100.0));
                ui.separator();
                ui.label(format!("{} unsaved", self.canvas.annotations().len()));
            });
        });

        // Dialogs take the keyboard while open
        let dialog_open = if let Some(message) = &self.message {
            if dialogs::message(ctx, message) {
                self.message = None;
            }
            true
        } else if matches!(self.canvas.tool(), ToolState::AwaitingClass(_)) {
            let classes = self.canvas.context().classes.clone();
            match dialogs::class_selection(ctx, &classes, &mut self.class_choice) {
                ClassChoice::Chosen(index) => self.canvas.choose_class(Some(index)),
                ClassChoice::Canceled => self.canvas.choose_class(None),
                ClassChoice::Pending => {}
            }
            true
        } else {
            false
        };

        if !dialog_open {
            self.handle_keyboard(ctx);
        }

        if self.image_changed {
            self.view.refresh_texture(ctx, &self.canvas);
            self.image_changed = false;
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.view.show(ui, &mut self.canvas, !dialog_open))
            .inner;

        if let Action::AnnotationAdded(index) = canvas_action {
            log::debug!("Canvas committed annotation {}", index);
        }
    }
}
