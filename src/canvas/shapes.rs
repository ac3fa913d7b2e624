// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory annotation list.
//!
//! Annotations are addressed by their position. Insertion order is the
//! z-order for drawing and for hit testing.

use crate::models::annotation::{Annotation, Handle, Point, Rect, Shape};
use crate::util::geometry::polygon_contains;
use std::path::Path;

pub struct ShapeModel {
    annotations: Vec<Annotation>,
    min_rect_size: i32,
}

impl ShapeModel {
    pub fn new(min_rect_size: i32) -> Self {
        Self {
            annotations: Vec::new(),
            min_rect_size,
        }
    }

    /// Append an annotation, returning its index.
    ///
    /// Undersized rectangles and polygons with fewer than three vertices are
    /// dropped and `None` is returned.
    pub fn add(&mut self, annotation: Annotation) -> Option<usize> {
        match &annotation.shape {
            Shape::Rect(rect) if !rect.is_at_least(self.min_rect_size) => {
                log::debug!("Discarding {}x{} rectangle", rect.width, rect.height);
                return None;
            }
            Shape::Polygon(vertices) if vertices.len() < 3 => {
                log::debug!("Discarding polygon with {} vertices", vertices.len());
                return None;
            }
            _ => {}
        }

        self.annotations.push(annotation);
        Some(self.annotations.len() - 1)
    }

    /// Translate every coordinate of the annotation at `index` by `delta`.
    pub fn translate(&mut self, index: usize, delta: Point) -> bool {
        match self.annotations.get_mut(index) {
            Some(annotation) => {
                annotation.shape.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Move one corner of the rectangle at `index` to `point`.
    ///
    /// Returns the handle now under `point`, or `None` if `index` is not a
    /// rectangle.
    pub fn resize_rect(&mut self, index: usize, handle: Handle, point: Point) -> Option<Handle> {
        match self.annotations.get_mut(index).map(|a| &mut a.shape) {
            Some(Shape::Rect(rect)) => Some(rect.drag_corner(handle, point)),
            _ => None,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Annotation> {
        (index < self.annotations.len()).then(|| self.annotations.remove(index))
    }

    pub fn remove_all_for_image(&mut self, image_path: &Path) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.image_path != image_path);
        before - self.annotations.len()
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn rect(&self, index: usize) -> Option<Rect> {
        match self.get(index)?.shape {
            Shape::Rect(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations belonging to `image_path`, with their indices.
    pub fn for_image<'a>(
        &'a self,
        image_path: &'a Path,
    ) -> impl Iterator<Item = (usize, &'a Annotation)> + 'a {
        self.annotations
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.image_path == image_path)
    }

    /// First annotation of `image_path` whose body contains `point`.
    ///
    /// Points are hit within a `point_hit_size` square centered on them.
    pub fn hit_body(&self, image_path: &Path, point: Point, point_hit_size: i32) -> Option<usize> {
        self.for_image(image_path)
            .find(|(_, annotation)| match &annotation.shape {
                Shape::Rect(rect) => rect.contains(point),
                Shape::Polygon(vertices) => polygon_contains(vertices, point),
                Shape::Point(center) => {
                    let half = point_hit_size / 2;
                    Rect::new(center.x - half, center.y - half, point_hit_size, point_hit_size)
                        .contains(point)
                }
            })
            .map(|(index, _)| index)
    }
}
