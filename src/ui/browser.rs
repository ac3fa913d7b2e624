// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project, subproject and folder selection panel.

use crate::models::color::Rgba;
use crate::models::project::{ProjectData, ProjectEntry};
use crate::ui::color32;

/// Result of browser interaction.
pub enum BrowserAction {
    None,
    SelectProject(usize),
    SelectSubproject(usize),
    SelectFolder(String),
}

/// Current selection shown by the browser.
pub struct BrowserState<'a> {
    pub projects: &'a [ProjectEntry],
    pub project: Option<usize>,
    pub data: Option<&'a ProjectData>,
    pub subproject: Option<usize>,
    pub folder: Option<&'a str>,
}

pub fn show(ui: &mut egui::Ui, state: &BrowserState) -> BrowserAction {
    let mut action = BrowserAction::None;

    ui.heading("Workspace");
    ui.separator();

    ui.label("Project:");
    let project_name = state
        .project
        .and_then(|i| state.projects.get(i))
        .map_or("—", |p| p.name.as_str());
    egui::ComboBox::from_id_source("project_combo")
        .selected_text(project_name)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for (index, project) in state.projects.iter().enumerate() {
                if ui
                    .selectable_label(state.project == Some(index), project.name.as_str())
                    .clicked()
                {
                    action = BrowserAction::SelectProject(index);
                }
            }
        });

    let Some(data) = state.data else {
        if state.projects.is_empty() {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("No projects found").weak());
        }
        return action;
    };

    ui.add_space(8.0);
    ui.label("Subproject:");
    let subproject = state.subproject.and_then(|i| data.subprojects.get(i));
    egui::ComboBox::from_id_source("subproject_combo")
        .selected_text(subproject.map_or("—", |s| s.name.as_str()))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for (index, sub) in data.subprojects.iter().enumerate() {
                if ui
                    .selectable_label(state.subproject == Some(index), sub.name.as_str())
                    .clicked()
                {
                    action = BrowserAction::SelectSubproject(index);
                }
            }
        });

    let Some(subproject) = subproject else {
        return action;
    };

    ui.add_space(8.0);
    ui.label("Classes:");
    if subproject.classes.is_empty() {
        ui.label(egui::RichText::new("No classes defined").weak());
    }
    for class in &subproject.classes {
        let color = Rgba::parse_or_black(&class.color);
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, color32(color));
            ui.label(class.name.as_str());
        });
    }

    ui.add_space(8.0);
    ui.label("Folders in progress:");
    let folders = data.in_progress_folders(&subproject.name);
    if folders.is_empty() {
        ui.label(egui::RichText::new("No folders in progress").weak());
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        for (name, entry) in folders {
            let text = format!("{} ({} frames)", name, entry.total);
            let response = ui.selectable_label(state.folder == Some(name), text);
            if response.on_hover_text(entry.path.as_str()).clicked() {
                action = BrowserAction::SelectFolder(name.to_string());
            }
        }
    });

    action
}
