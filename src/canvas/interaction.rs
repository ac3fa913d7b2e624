// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer interaction: tools, the gesture state machine and hit testing.
//!
//! Pointer positions arrive in view space and are mapped to image space
//! before any geometric test. Every handler is a no-op while no image is
//! displayed.

use super::viewport::Zoom;
use super::AnnotationCanvas;
use crate::error::CanvasError;
use crate::models::annotation::{Annotation, Handle, Point, Rect, Shape};
use crate::models::project::AnnotationClass;
use crate::util::geometry::{ViewPoint, ViewRect};

/// Drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Rect,
    Polygon,
    Point,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Rect => "Rectangle",
            Tool::Polygon => "Polygon",
            Tool::Point => "Point",
        }
    }
}

/// Whether a tool is armed, and with which class.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Disarmed,
    /// A tool was requested; the user still has to pick a class.
    AwaitingClass(Tool),
    Armed { tool: Tool, class: AnnotationClass },
}

impl ToolState {
    pub fn armed(&self) -> Option<(Tool, &AnnotationClass)> {
        match self {
            ToolState::Armed { tool, class } => Some((*tool, class)),
            _ => None,
        }
    }
}

/// Gesture in progress between pointer events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last: ViewPoint,
        /// Vertices of a polygon being built when panning started.
        polygon: Vec<Point>,
    },
    DrawingRect {
        start: Point,
        end: Point,
    },
    DraggingHandle {
        index: usize,
        handle: Handle,
    },
    MovingAnnotation {
        index: usize,
        last: Point,
    },
    BuildingPolygon {
        vertices: Vec<Point>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub selected: Option<usize>,
    pub hovered_handle: Option<Handle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Default,
    Crosshair,
    Grabbing,
    /// Diagonal resize through the top-left and bottom-right corners.
    ResizeNwSe,
    /// Diagonal resize through the top-right and bottom-left corners.
    ResizeNeSw,
}

/// Result of an input handler for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    AnnotationAdded(usize),
}

impl AnnotationCanvas {
    // --- Tools ---

    /// Ask to arm `tool`. On success the host must let the user pick a class
    /// and report it through [`AnnotationCanvas::choose_class`].
    pub fn request_tool(&mut self, tool: Tool) -> Result<(), CanvasError> {
        self.discard_gesture();
        self.tool = ToolState::Disarmed;

        if !self.context.has_subproject() {
            log::warn!("{} tool requested without a subproject", tool.label());
            return Err(CanvasError::NoSubproject);
        }
        if self.context.classes.is_empty() {
            log::warn!("{} tool requested but {} has no classes", tool.label(), self.context.subproject);
            return Err(CanvasError::NoClasses);
        }

        self.tool = ToolState::AwaitingClass(tool);
        Ok(())
    }

    /// Complete a tool request. `None` means the class choice was canceled,
    /// which always disarms the tool.
    pub fn choose_class(&mut self, class_index: Option<usize>) {
        let ToolState::AwaitingClass(tool) = self.tool else {
            return;
        };

        match class_index.and_then(|i| self.context.classes.get(i)) {
            Some(class) => {
                log::info!("Armed {} tool with class {}", tool.label(), class.name);
                self.tool = ToolState::Armed {
                    tool,
                    class: class.clone(),
                };
            }
            None => {
                log::debug!("Class selection canceled, {} tool disarmed", tool.label());
                self.tool = ToolState::Disarmed;
            }
        }
    }

    /// Disarm the tool, drop any shape in progress and clear the selection.
    pub fn cancel_tool(&mut self) {
        self.discard_gesture();
        self.tool = ToolState::Disarmed;
        self.selection = Selection::default();
    }

    /// Commit the polygon being built. Fewer than three vertices are discarded.
    pub fn finalize_polygon(&mut self) -> Action {
        let InteractionState::BuildingPolygon { vertices } = &mut self.state else {
            return Action::None;
        };
        let mut vertices = std::mem::take(vertices);
        vertices.dedup();
        self.state = InteractionState::Idle;

        let added = self.commit(Shape::Polygon(vertices));
        self.tool = ToolState::Disarmed;
        added.map_or(Action::Redraw, Action::AnnotationAdded)
    }

    // --- Pointer events ---

    pub fn pointer_pressed(&mut self, button: PointerButton, pos: ViewPoint) -> Action {
        if !self.viewport.has_image() {
            return Action::None;
        }

        match button {
            PointerButton::Secondary => self.start_panning(pos),
            PointerButton::Primary => self.primary_pressed(pos),
        }
    }

    pub fn pointer_moved(&mut self, pos: ViewPoint) -> Action {
        if !self.viewport.has_image() {
            return Action::None;
        }

        let point = self.viewport.mapper().to_image(pos);
        match &mut self.state {
            InteractionState::Panning { last, .. } => {
                let delta = Point::new((pos.x - last.x).trunc() as i32, (pos.y - last.y).trunc() as i32);
                if delta == Point::default() {
                    return Action::None;
                }
                last.x += delta.x as f64;
                last.y += delta.y as f64;
                self.viewport.pan(delta);
                Action::Redraw
            }
            InteractionState::DrawingRect { end, .. } => {
                *end = point;
                Action::Redraw
            }
            InteractionState::DraggingHandle { index, handle } => {
                match self.shapes.resize_rect(*index, *handle, point) {
                    Some(now) => *handle = now,
                    None => self.state = InteractionState::Idle,
                }
                Action::Redraw
            }
            InteractionState::MovingAnnotation { index, last } => {
                let delta = last.delta_to(point);
                if delta == Point::default() {
                    return Action::None;
                }
                *last = point;
                if !self.shapes.translate(*index, delta) {
                    self.state = InteractionState::Idle;
                }
                Action::Redraw
            }
            InteractionState::Idle | InteractionState::BuildingPolygon { .. } => self.update_hover(pos),
        }
    }

    pub fn pointer_released(&mut self, button: PointerButton, pos: ViewPoint) -> Action {
        match button {
            PointerButton::Secondary => {
                let InteractionState::Panning { polygon, .. } = &mut self.state else {
                    return Action::None;
                };
                self.state = match std::mem::take(polygon) {
                    vertices if vertices.is_empty() => InteractionState::Idle,
                    vertices => InteractionState::BuildingPolygon { vertices },
                };
                Action::Redraw
            }
            PointerButton::Primary => self.primary_released(pos),
        }
    }

    /// Wheel input. Zooms around `pos` when the zoom modifier is held
    /// (`direction` is `Some`); plain scrolling is left to the host.
    pub fn wheel(&mut self, direction: Option<Zoom>, pos: ViewPoint) -> Action {
        match direction {
            Some(direction) if self.viewport.zoom(direction, pos) => Action::Redraw,
            _ => Action::None,
        }
    }

    pub fn cursor(&self) -> CursorShape {
        match (&self.state, self.selection.hovered_handle) {
            (InteractionState::Panning { .. }, _) => CursorShape::Grabbing,
            (_, Some(Handle::TopLeft | Handle::BottomRight)) => CursorShape::ResizeNwSe,
            (_, Some(Handle::TopRight | Handle::BottomLeft)) => CursorShape::ResizeNeSw,
            _ if self.tool.armed().is_some() => CursorShape::Crosshair,
            _ => CursorShape::Default,
        }
    }

    // --- Internals ---

    fn start_panning(&mut self, pos: ViewPoint) -> Action {
        let polygon = match std::mem::take(&mut self.state) {
            InteractionState::Idle => Vec::new(),
            InteractionState::BuildingPolygon { vertices } => vertices,
            other => {
                // Another gesture owns the pointer.
                self.state = other;
                return Action::None;
            }
        };
        self.state = InteractionState::Panning { last: pos, polygon };
        Action::Redraw
    }

    fn primary_pressed(&mut self, pos: ViewPoint) -> Action {
        if self.active_image_path().is_none() || matches!(self.state, InteractionState::Panning { .. }) {
            return Action::None;
        }
        let point = self.viewport.mapper().to_image(pos);

        match self.tool.armed().map(|(tool, _)| tool) {
            Some(Tool::Rect) => {
                self.state = InteractionState::DrawingRect { start: point, end: point };
                Action::Redraw
            }
            Some(Tool::Polygon) => {
                match &mut self.state {
                    // The second press of a double-click lands on the last vertex.
                    InteractionState::BuildingPolygon { vertices } if vertices.last() == Some(&point) => {}
                    InteractionState::BuildingPolygon { vertices } => vertices.push(point),
                    _ => {
                        self.state = InteractionState::BuildingPolygon { vertices: vec![point] }
                    }
                }
                Action::Redraw
            }
            Some(Tool::Point) => {
                let added = self.commit(Shape::Point(point));
                self.tool = ToolState::Disarmed;
                added.map_or(Action::Redraw, Action::AnnotationAdded)
            }
            None if matches!(self.tool, ToolState::AwaitingClass(_)) => Action::None,
            None => self.select_at(pos, point),
        }
    }

    fn select_at(&mut self, pos: ViewPoint, point: Point) -> Action {
        if let Some((index, handle)) = self.handle_at(pos) {
            self.state = InteractionState::DraggingHandle { index, handle };
            return Action::Redraw;
        }

        let Some(image_path) = self.active_image_path() else {
            return Action::None;
        };
        let hit = self
            .shapes
            .hit_body(image_path, point, self.config.point_hit_size);

        self.selection.selected = hit;
        self.selection.hovered_handle = None;
        if let Some(index) = hit {
            log::debug!("Selected annotation {}", index);
            self.state = InteractionState::MovingAnnotation { index, last: point };
        }
        Action::Redraw
    }

    fn primary_released(&mut self, pos: ViewPoint) -> Action {
        match std::mem::take(&mut self.state) {
            InteractionState::DrawingRect { start, .. } if self.viewport.has_image() => {
                let end = self.viewport.mapper().to_image(pos);
                let rect = Rect::from_corners(start, end);
                if !rect.is_at_least(self.config.min_rect_size) {
                    log::debug!("Rectangle {}x{} below minimum size", rect.width, rect.height);
                    return Action::Redraw;
                }

                let added = self.commit(Shape::Rect(rect));
                self.tool = ToolState::Disarmed;
                added.map_or(Action::Redraw, Action::AnnotationAdded)
            }
            InteractionState::DrawingRect { .. } => Action::None,
            InteractionState::DraggingHandle { .. } | InteractionState::MovingAnnotation { .. } => {
                Action::Redraw
            }
            other => {
                self.state = other;
                Action::None
            }
        }
    }

    /// Corner handle of the selected rectangle under `pos`.
    fn handle_at(&self, pos: ViewPoint) -> Option<(usize, Handle)> {
        let index = self.selection.selected?;
        let rect = self.shapes.rect(index)?;
        let mapper = self.viewport.mapper();

        Handle::ALL
            .into_iter()
            .find(|handle| {
                ViewRect::from_center_size(mapper.to_view(rect.corner(*handle)), self.config.handle_size)
                    .contains(pos)
            })
            .map(|handle| (index, handle))
    }

    fn update_hover(&mut self, pos: ViewPoint) -> Action {
        let hovered = self.handle_at(pos).map(|(_, handle)| handle);
        if hovered == self.selection.hovered_handle {
            return Action::None;
        }
        self.selection.hovered_handle = hovered;
        Action::Redraw
    }

    /// Store a new shape tagged with the armed class and the active image.
    fn commit(&mut self, shape: Shape) -> Option<usize> {
        let (_, class) = self.tool.armed()?;
        let image_path = self.active_image_path()?.to_path_buf();
        let annotation = Annotation::new(shape, class.name.clone(), class.color.clone(), image_path);
        let kind = annotation.shape.kind();

        let index = self.shapes.add(annotation);
        match index {
            Some(index) => {
                log::info!("Added {:?} annotation {} ({} in memory)", kind, index, self.shapes.len());
                self.selection = Default::default();
            }
            None => log::info!("Discarded {:?} annotation below minimum size", kind),
        }
        index
    }

    /// Drop the gesture in progress, keeping a pan alive.
    pub(super) fn discard_gesture(&mut self) {
        match &mut self.state {
            InteractionState::Panning { polygon, .. } => polygon.clear(),
            _ => self.state = InteractionState::Idle,
        }
    }
}
