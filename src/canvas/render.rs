// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Projection of the canvas state into a flat list of draw commands.
//!
//! Commands are in view space and in painting order: the image crop first,
//! then the annotations of the active image, then the shape in progress.

use super::interaction::{InteractionState, Tool};
use super::AnnotationCanvas;
use crate::models::annotation::{Annotation, Handle, Point, Rect, Shape};
use crate::models::color::Rgba;
use crate::util::geometry::{top_left, Mapper, ViewPoint, ViewRect};

const STROKE_WIDTH: f32 = 2.0;
const SELECTED_STROKE_WIDTH: f32 = 3.0;
const POINT_RADIUS: f64 = 5.0;
const VERTEX_RADIUS: f64 = 3.0;

/// Label placement relative to its anchor (top-left of the text).
const RECT_LABEL_OFFSET: ViewPoint = ViewPoint { x: 5.0, y: 3.0 };
const POINT_LABEL_OFFSET: ViewPoint = ViewPoint { x: 8.0, y: -7.0 };

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw the part of the base image given by `uv` (normalized texture
    /// coordinates) into `rect`.
    Image { rect: ViewRect, uv: ViewRect },
    Rect { rect: ViewRect, color: Rgba, width: f32 },
    /// Closed outline, or an open polyline while a polygon is being built.
    Polygon { points: Vec<ViewPoint>, closed: bool, color: Rgba, width: f32 },
    Circle { center: ViewPoint, radius: f64, fill: Option<Rgba>, stroke: Rgba, width: f32 },
    Handle { rect: ViewRect, fill: Rgba, outline: Rgba },
    Label { pos: ViewPoint, text: String, color: Rgba },
}

impl AnnotationCanvas {
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let Some(image) = self.image_command() else {
            return commands;
        };
        commands.push(image);

        let mapper = self.viewport.mapper();
        if let Some(image_path) = self.active_image_path() {
            for (index, annotation) in self.shapes.for_image(image_path) {
                let selected = self.selection.selected == Some(index);
                draw_annotation(&mut commands, &mapper, annotation, selected);
                if selected {
                    self.draw_handles(&mut commands, &mapper, annotation);
                }
            }
        }

        self.draw_preview(&mut commands, &mapper);
        commands
    }

    fn image_command(&self) -> Option<DrawCommand> {
        let crop = self.viewport.visible_crop()?;
        let (scaled_width, scaled_height) = self.viewport.scaled_size()?;
        if scaled_width <= 0 || scaled_height <= 0 {
            return None;
        }

        let width = crop.width.min(scaled_width - crop.x).max(0) as f64;
        let height = crop.height.min(scaled_height - crop.y).max(0) as f64;
        let (sw, sh) = (scaled_width as f64, scaled_height as f64);

        Some(DrawCommand::Image {
            rect: ViewRect {
                min: ViewPoint::new(0.0, 0.0),
                max: ViewPoint::new(width, height),
            },
            uv: ViewRect {
                min: ViewPoint::new(crop.x as f64 / sw, crop.y as f64 / sh),
                max: ViewPoint::new((crop.x as f64 + width) / sw, (crop.y as f64 + height) / sh),
            },
        })
    }

    fn draw_handles(&self, commands: &mut Vec<DrawCommand>, mapper: &Mapper, annotation: &Annotation) {
        let Shape::Rect(rect) = annotation.shape else {
            return;
        };
        let fill = Rgba::parse_or_black(&annotation.color);

        for handle in Handle::ALL {
            let size = match self.selection.hovered_handle {
                Some(hovered) if hovered == handle => self.config.handle_size + 2.0,
                _ => self.config.handle_size,
            };
            commands.push(DrawCommand::Handle {
                rect: ViewRect::from_center_size(mapper.to_view(rect.corner(handle)), size),
                fill,
                outline: Rgba::WHITE,
            });
        }
    }

    /// The shape being drawn, in the armed class color.
    fn draw_preview(&self, commands: &mut Vec<DrawCommand>, mapper: &Mapper) {
        let Some((tool, class)) = self.tool.armed() else {
            return;
        };
        let color = Rgba::parse_or_black(&class.color);

        match &self.state {
            InteractionState::DrawingRect { start, end } if tool == Tool::Rect => {
                let rect = view_rect(mapper, Rect::from_corners(*start, *end));
                commands.push(DrawCommand::Rect { rect, color, width: STROKE_WIDTH });
                commands.push(label(rect.min, RECT_LABEL_OFFSET, &class.name));
            }
            InteractionState::BuildingPolygon { vertices }
            | InteractionState::Panning { polygon: vertices, .. }
                if tool == Tool::Polygon && !vertices.is_empty() =>
            {
                let points: Vec<ViewPoint> = vertices.iter().map(|p| mapper.to_view(*p)).collect();
                if points.len() > 1 {
                    commands.push(DrawCommand::Polygon {
                        points: points.clone(),
                        closed: false,
                        color,
                        width: STROKE_WIDTH,
                    });
                }
                commands.extend(points.into_iter().map(|center| DrawCommand::Circle {
                    center,
                    radius: VERTEX_RADIUS,
                    fill: Some(color),
                    stroke: color,
                    width: 1.0,
                }));
            }
            _ => {}
        }
    }
}

fn draw_annotation(commands: &mut Vec<DrawCommand>, mapper: &Mapper, annotation: &Annotation, selected: bool) {
    let color = Rgba::parse_or_black(&annotation.color);
    let width = if selected { SELECTED_STROKE_WIDTH } else { STROKE_WIDTH };

    match &annotation.shape {
        Shape::Rect(rect) => {
            let rect = view_rect(mapper, *rect);
            commands.push(DrawCommand::Rect { rect, color, width });
            commands.push(label(rect.min, RECT_LABEL_OFFSET, &annotation.class_name));
        }
        Shape::Polygon(vertices) => {
            let points: Vec<ViewPoint> = vertices.iter().map(|p| mapper.to_view(*p)).collect();
            let anchor = top_left(&points);
            commands.push(DrawCommand::Polygon { points, closed: true, color, width });
            if let Some(anchor) = anchor {
                commands.push(label(anchor, RECT_LABEL_OFFSET, &annotation.class_name));
            }
        }
        Shape::Point(point) => {
            let center = mapper.to_view(*point);
            commands.push(DrawCommand::Circle {
                center,
                radius: POINT_RADIUS,
                fill: None,
                stroke: color,
                width,
            });
            commands.push(label(center, POINT_LABEL_OFFSET, &annotation.class_name));
        }
    }
}

fn view_rect(mapper: &Mapper, rect: Rect) -> ViewRect {
    ViewRect {
        min: mapper.to_view(Point::new(rect.x, rect.y)),
        max: mapper.to_view(Point::new(rect.x + rect.width, rect.y + rect.height)),
    }
}

fn label(anchor: ViewPoint, offset: ViewPoint, text: &str) -> DrawCommand {
    DrawCommand::Label {
        pos: ViewPoint::new(anchor.x + offset.x, anchor.y + offset.y),
        text: text.to_string(),
        color: Rgba::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::interaction::PointerButton;
    use crate::canvas::tests::canvas_with_image;
    use crate::canvas::viewport::Zoom;
    use image::RgbaImage;

    fn rects(commands: &[DrawCommand]) -> Vec<(ViewRect, f32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, width, .. } => Some((*rect, *width)),
                _ => None,
            })
            .collect()
    }

    fn add_rect(canvas: &mut AnnotationCanvas, from: (f64, f64), to: (f64, f64)) {
        canvas.request_tool(Tool::Rect).unwrap();
        canvas.choose_class(Some(0));
        canvas.pointer_pressed(PointerButton::Primary, ViewPoint::new(from.0, from.1));
        canvas.pointer_released(PointerButton::Primary, ViewPoint::new(to.0, to.1));
    }

    #[test]
    fn test_no_image_draws_nothing() {
        let mut canvas = canvas_with_image();
        canvas.viewport.clear_image();
        assert!(canvas.draw_commands().is_empty());
    }

    #[test]
    fn test_image_crop_uv() {
        let mut canvas = canvas_with_image();
        canvas.viewport.pan(Point::new(-100, -50));

        match &canvas.draw_commands()[0] {
            DrawCommand::Image { rect, uv } => {
                assert_eq!(rect.max, ViewPoint::new(400.0, 300.0));
                assert!((uv.min.x - 0.1).abs() < 1e-9);
                assert!((uv.min.y - 50.0 / 800.0).abs() < 1e-9);
                assert!((uv.max.x - 0.5).abs() < 1e-9);
            }
            other => panic!("expected image first, got {:?}", other),
        }
    }

    #[test]
    fn test_small_image_not_stretched() {
        let mut canvas = canvas_with_image();
        canvas.display(0, RgbaImage::new(200, 100));

        match &canvas.draw_commands()[0] {
            DrawCommand::Image { rect, uv } => {
                assert_eq!(rect.max, ViewPoint::new(200.0, 100.0));
                assert_eq!(uv.max, ViewPoint::new(1.0, 1.0));
            }
            other => panic!("expected image first, got {:?}", other),
        }
    }

    #[test]
    fn test_only_active_image_annotations_drawn() {
        let mut canvas = canvas_with_image();
        add_rect(&mut canvas, (10.0, 10.0), (50.0, 50.0));
        canvas.display(1, RgbaImage::new(1000, 800));
        add_rect(&mut canvas, (100.0, 100.0), (200.0, 150.0));

        let drawn = rects(&canvas.draw_commands());
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].0.min, ViewPoint::new(100.0, 100.0));
    }

    #[test]
    fn test_annotations_follow_zoom() {
        let mut canvas = canvas_with_image();
        add_rect(&mut canvas, (10.0, 10.0), (50.0, 50.0));
        canvas.wheel(Some(Zoom::In), ViewPoint::new(0.0, 0.0));

        let drawn = rects(&canvas.draw_commands());
        assert!((drawn[0].0.min.x - 11.0).abs() < 1e-9);
        assert!((drawn[0].0.max.x - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_selected_rect_has_thicker_stroke_and_handles() {
        let mut canvas = canvas_with_image();
        add_rect(&mut canvas, (10.0, 10.0), (50.0, 50.0));
        canvas.pointer_pressed(PointerButton::Primary, ViewPoint::new(20.0, 20.0));
        canvas.pointer_released(PointerButton::Primary, ViewPoint::new(20.0, 20.0));

        let commands = canvas.draw_commands();
        assert_eq!(rects(&commands)[0].1, SELECTED_STROKE_WIDTH);
        let handles = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Handle { .. }))
            .count();
        assert_eq!(handles, 4);
    }

    #[test]
    fn test_rect_preview_while_dragging() {
        let mut canvas = canvas_with_image();
        canvas.request_tool(Tool::Rect).unwrap();
        canvas.choose_class(Some(1));
        canvas.pointer_pressed(PointerButton::Primary, ViewPoint::new(30.0, 30.0));
        canvas.pointer_moved(ViewPoint::new(10.0, 20.0));

        let commands = canvas.draw_commands();
        assert_eq!(
            rects(&commands),
            vec![(
                ViewRect {
                    min: ViewPoint::new(10.0, 20.0),
                    max: ViewPoint::new(30.0, 30.0)
                },
                STROKE_WIDTH
            )]
        );
        assert!(commands.iter().any(
            |c| matches!(c, DrawCommand::Label { text, .. } if text == "person")
        ));
    }

    #[test]
    fn test_polygon_preview_is_open() {
        let mut canvas = canvas_with_image();
        canvas.request_tool(Tool::Polygon).unwrap();
        canvas.choose_class(Some(0));
        for (x, y) in [(0.0, 0.0), (10.0, 0.0)] {
            canvas.pointer_pressed(PointerButton::Primary, ViewPoint::new(x, y));
            canvas.pointer_released(PointerButton::Primary, ViewPoint::new(x, y));
        }

        let commands = canvas.draw_commands();
        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Polygon { closed: false, points, .. } if points.len() == 2)));
        let dots = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(dots, 2);
    }
}
