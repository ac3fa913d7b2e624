// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the annotation record (one marked region on one
//! image), the three shape variants it can carry, and the on-disk JSON
//! form of a record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    pub fn delta_to(self, other: Point) -> Point {
        Point::new(other.x - self.x, other.y - self.y)
    }
}

/// A corner handle of a rectangle, in clockwise order from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
    ];

    pub fn opposite(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomRight => Handle::TopLeft,
            Handle::BottomLeft => Handle::TopRight,
        }
    }

    /// Which corner `point` occupies relative to `anchor`.
    fn from_quadrant(anchor: Point, point: Point) -> Handle {
        match (point.x < anchor.x, point.y < anchor.y) {
            (true, true) => Handle::TopLeft,
            (false, true) => Handle::TopRight,
            (false, false) => Handle::BottomRight,
            (true, false) => Handle::BottomLeft,
        }
    }
}

/// An axis-aligned rectangle in image pixel space.
///
/// Corners are exclusive on the right/bottom: the bottom-right corner is
/// `(x + width, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn corner(&self, handle: Handle) -> Point {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        match handle {
            Handle::TopLeft => Point::new(self.x, self.y),
            Handle::TopRight => Point::new(right, self.y),
            Handle::BottomRight => Point::new(right, bottom),
            Handle::BottomLeft => Point::new(self.x, bottom),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn translate(&mut self, delta: Point) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Move the corner at `handle` to `point`, keeping the opposite corner fixed.
    ///
    /// Returns the handle the dragged corner occupies after normalization.
    pub fn drag_corner(&mut self, handle: Handle, point: Point) -> Handle {
        let anchor = self.corner(handle.opposite());
        *self = Rect::from_corners(anchor, point);
        Handle::from_quadrant(anchor, point)
    }

    pub fn is_at_least(&self, min_size: i32) -> bool {
        self.width >= min_size && self.height >= min_size
    }

    pub fn to_array(self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Geometry of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Rect(Rect),
    Polygon(Vec<Point>),
    Point(Point),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Point(_) => ShapeKind::Point,
        }
    }

    pub fn translate(&mut self, delta: Point) {
        match self {
            Shape::Rect(rect) => rect.translate(delta),
            Shape::Polygon(vertices) => {
                for vertex in vertices.iter_mut() {
                    *vertex = vertex.offset(delta);
                }
            }
            Shape::Point(point) => *point = point.offset(delta),
        }
    }
}

/// Tag written as `"type"` in annotation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Polygon,
    Point,
}

/// One marked region on one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationRecord", into = "AnnotationRecord")]
pub struct Annotation {
    pub shape: Shape,
    pub class_name: String,
    /// Class color at creation time.
    pub color: String,
    pub image_path: PathBuf,
}

impl Annotation {
    pub fn new(
        shape: Shape,
        class_name: impl Into<String>,
        color: impl Into<String>,
        image_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            shape,
            class_name: class_name.into(),
            color: color.into(),
            image_path: image_path.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Coordinates {
    Rect([i32; 4]),
    Point([i32; 2]),
    Polygon(Vec<[i32; 2]>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationRecord {
    #[serde(rename = "type")]
    kind: ShapeKind,
    #[serde(rename = "class")]
    class_name: String,
    color: String,
    coordinates: Coordinates,
    image: PathBuf,
}

impl From<Annotation> for AnnotationRecord {
    fn from(annotation: Annotation) -> Self {
        let kind = annotation.shape.kind();
        let coordinates = match annotation.shape {
            Shape::Rect(rect) => Coordinates::Rect(rect.to_array()),
            Shape::Polygon(vertices) => {
                Coordinates::Polygon(vertices.iter().map(|p| [p.x, p.y]).collect())
            }
            Shape::Point(point) => Coordinates::Point([point.x, point.y]),
        };

        Self {
            kind,
            class_name: annotation.class_name,
            color: annotation.color,
            coordinates,
            image: annotation.image_path,
        }
    }
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = String;

    fn try_from(record: AnnotationRecord) -> Result<Self, Self::Error> {
        let shape = match (record.kind, record.coordinates) {
            (ShapeKind::Rect, Coordinates::Rect([x, y, w, h])) => {
                if w < 0 || h < 0 {
                    return Err(format!("rect has negative size: {}x{}", w, h));
                }
                Shape::Rect(Rect::new(x, y, w, h))
            }
            (ShapeKind::Polygon, Coordinates::Polygon(vertices)) => {
                if vertices.len() < 3 {
                    return Err(format!("polygon has {} vertices, need 3", vertices.len()));
                }
                Shape::Polygon(vertices.into_iter().map(|[x, y]| Point::new(x, y)).collect())
            }
            (ShapeKind::Point, Coordinates::Point([x, y])) => Shape::Point(Point::new(x, y)),
            (kind, coordinates) => {
                return Err(format!(
                    "coordinates {:?} do not match annotation type {:?}",
                    coordinates, kind
                ))
            }
        };

        Ok(Self {
            shape,
            class_name: record.class_name,
            color: record.color,
            image_path: record.image,
        })
    }
}
