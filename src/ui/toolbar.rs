// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with drawing tools, saving and image navigation.

use crate::canvas::interaction::{Tool, ToolState};
use crate::models::color::Rgba;
use crate::ui::color32;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    RequestTool(Tool),
    Save,
    PrevImage,
    NextImage,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, tool: &ToolState, counter: &str, has_images: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        let active = match tool {
            ToolState::Armed { tool, .. } | ToolState::AwaitingClass(tool) => Some(*tool),
            ToolState::Disarmed => None,
        };
        for (candidate, icon) in [(Tool::Rect, "▭"), (Tool::Polygon, "▱"), (Tool::Point, "•")] {
            let text = format!("{} {}", icon, candidate.label());
            if ui.selectable_label(active == Some(candidate), text).clicked() {
                action = ToolbarAction::RequestTool(candidate);
            }
        }

        ui.separator();
        if ui.button("💾 Save").clicked() {
            action = ToolbarAction::Save;
        }

        ui.separator();
        if ui.add_enabled(has_images, egui::Button::new("◀")).clicked() {
            action = ToolbarAction::PrevImage;
        }
        ui.label(counter);
        if ui.add_enabled(has_images, egui::Button::new("▶")).clicked() {
            action = ToolbarAction::NextImage;
        }

        ui.separator();
        if let Some((_, class)) = tool.armed() {
            let color = Rgba::parse_or_black(&class.color);
            let text = color.contrasting_text();
            ui.label(
                egui::RichText::new(format!(" {} ", class.name))
                    .background_color(color32(color))
                    .color(color32(text)),
            );
        }
        let hint = match tool {
            ToolState::Armed { tool: Tool::Rect, class } => {
                format!("Drag to draw a {} rectangle", class.name)
            }
            ToolState::Armed { tool: Tool::Polygon, class } => {
                format!("Click to add {} vertices, double-click or Enter to finish", class.name)
            }
            ToolState::Armed { tool: Tool::Point, class } => format!("Click to place a {} point", class.name),
            ToolState::AwaitingClass(_) => "Choose a class".to_string(),
            ToolState::Disarmed => "Click to select, drag to move, right-drag to pan, Ctrl+wheel to zoom".to_string(),
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
