// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! egui adapter for the annotation canvas.
//!
//! This module translates egui pointer input into canvas events and paints
//! the canvas draw commands inside the central panel.

use crate::canvas::interaction::{Action, CursorShape, PointerButton};
use crate::canvas::render::DrawCommand;
use crate::canvas::viewport::Zoom;
use crate::canvas::AnnotationCanvas;
use crate::ui::color32;
use crate::util::geometry::{ViewPoint, ViewRect};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};

/// Owns the GPU texture of the displayed image.
#[derive(Default)]
pub struct CanvasView {
    texture: Option<egui::TextureHandle>,
}

impl CanvasView {
    /// Re-upload the canvas bitmap. Call after the displayed image changes.
    pub fn refresh_texture(&mut self, ctx: &egui::Context, canvas: &AnnotationCanvas) {
        self.texture = canvas.viewport().image().map(|image| {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            ctx.load_texture("annotation_image", color_image, egui::TextureOptions::LINEAR)
        });
    }

    /// Display the canvas and, when `interactive`, feed it this frame's input.
    pub fn show(&mut self, ui: &mut egui::Ui, canvas: &mut AnnotationCanvas, interactive: bool) -> Action {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, Color32::from_gray(40));

        canvas.set_view_size(response.rect.width() as i32, response.rect.height() as i32);

        let mut action = Action::None;
        if self.texture.is_none() {
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                "Select a folder to start annotating",
                FontId::proportional(16.0),
                Color32::from_gray(180),
            );
        } else if interactive {
            action = handle_input(ui, &response, canvas, origin);
        }

        if let Some(texture) = &self.texture {
            for command in canvas.draw_commands() {
                paint(&painter, origin, texture.id(), command);
            }
        }

        if interactive && response.hovered() {
            ui.ctx().set_cursor_icon(cursor_icon(canvas.cursor()));
        }
        action
    }
}

fn handle_input(
    ui: &egui::Ui,
    response: &egui::Response,
    canvas: &mut AnnotationCanvas,
    origin: Pos2,
) -> Action {
    let to_view = |pos: Pos2| ViewPoint::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
    let (pointer, pressed, released, zoom) = ui.input(|i| {
        let buttons = [
            (egui::PointerButton::Primary, PointerButton::Primary),
            (egui::PointerButton::Secondary, PointerButton::Secondary),
        ];
        (
            i.pointer.latest_pos(),
            buttons
                .iter()
                .filter(|(egui_button, _)| i.pointer.button_pressed(*egui_button))
                .map(|(_, button)| *button)
                .collect::<Vec<_>>(),
            buttons
                .iter()
                .filter(|(egui_button, _)| i.pointer.button_released(*egui_button))
                .map(|(_, button)| *button)
                .collect::<Vec<_>>(),
            i.zoom_delta(),
        )
    });

    let Some(pos) = pointer.map(to_view) else {
        return Action::None;
    };
    let mut actions = Vec::new();

    if response.hovered() {
        for button in pressed {
            actions.push(canvas.pointer_pressed(button, pos));
        }
        if zoom > 1.0 {
            actions.push(canvas.wheel(Some(Zoom::In), pos));
        } else if zoom < 1.0 {
            actions.push(canvas.wheel(Some(Zoom::Out), pos));
        }
    }

    actions.push(canvas.pointer_moved(pos));

    for button in released {
        actions.push(canvas.pointer_released(button, pos));
    }

    if response.double_clicked() {
        actions.push(canvas.finalize_polygon());
    }

    actions
        .into_iter()
        .find(|a| matches!(a, Action::AnnotationAdded(_)))
        .unwrap_or(Action::None)
}

fn paint(painter: &egui::Painter, origin: Pos2, texture: egui::TextureId, command: DrawCommand) {
    let pos = |p: ViewPoint| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
    let rect = |r: ViewRect| Rect::from_min_max(pos(r.min), pos(r.max));
    let uv = |r: ViewRect| {
        Rect::from_min_max(
            Pos2::new(r.min.x as f32, r.min.y as f32),
            Pos2::new(r.max.x as f32, r.max.y as f32),
        )
    };

    match command {
        DrawCommand::Image { rect: target, uv: source } => {
            painter.image(texture, rect(target), uv(source), Color32::WHITE);
        }
        DrawCommand::Rect { rect: r, color, width } => {
            painter.rect_stroke(rect(r), 0.0, Stroke::new(width, color32(color)));
        }
        DrawCommand::Polygon { points, closed, color, width } => {
            let points: Vec<Pos2> = points.into_iter().map(pos).collect();
            let stroke = Stroke::new(width, color32(color));
            if closed {
                painter.add(egui::Shape::closed_line(points, stroke));
            } else {
                painter.add(egui::Shape::line(points, stroke));
            }
        }
        DrawCommand::Circle { center, radius, fill, stroke, width } => {
            painter.circle(
                pos(center),
                radius as f32,
                fill.map_or(Color32::TRANSPARENT, color32),
                Stroke::new(width, color32(stroke)),
            );
        }
        DrawCommand::Handle { rect: r, fill, outline } => {
            painter.rect(rect(r), 0.0, color32(fill), Stroke::new(1.0, color32(outline)));
        }
        DrawCommand::Label { pos: at, text, color } => {
            painter.text(pos(at), Align2::LEFT_TOP, text, FontId::proportional(13.0), color32(color));
        }
    }
}

fn cursor_icon(cursor: CursorShape) -> egui::CursorIcon {
    match cursor {
        CursorShape::Default => egui::CursorIcon::Default,
        CursorShape::Crosshair => egui::CursorIcon::Crosshair,
        CursorShape::Grabbing => egui::CursorIcon::Grabbing,
        CursorShape::ResizeNwSe => egui::CursorIcon::ResizeNwSe,
        CursorShape::ResizeNeSw => egui::CursorIcon::ResizeNeSw,
    }
}
