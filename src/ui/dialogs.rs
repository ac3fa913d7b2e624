// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal-style windows: class selection and messages.

use crate::models::project::AnnotationClass;

/// Outcome of the class selection window.
pub enum ClassChoice {
    Pending,
    Chosen(usize),
    Canceled,
}

/// Ask which class the armed tool annotates with.
pub fn class_selection(ctx: &egui::Context, classes: &[AnnotationClass], choice: &mut usize) -> ClassChoice {
    let mut result = ClassChoice::Pending;

    egui::Window::new("Select class")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let selected = classes.get(*choice).map_or("", |c| c.name.as_str());
            egui::ComboBox::from_id_source("class_combo")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (index, class) in classes.iter().enumerate() {
                        ui.selectable_value(choice, index, class.name.as_str());
                    }
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    result = ClassChoice::Chosen(*choice);
                }
                if ui.button("Cancel").clicked() {
                    result = ClassChoice::Canceled;
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = ClassChoice::Canceled;
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A message waiting to be acknowledged.
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }
}

/// Show `message`. Returns `true` once it is dismissed.
pub fn message(ctx: &egui::Context, message: &Message) -> bool {
    let title = match message.severity {
        Severity::Info => "Information",
        Severity::Warning => "Warning",
    };
    let mut dismissed = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message.text.as_str());
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter))
}
