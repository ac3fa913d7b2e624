// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the mapping between view space (pixels inside the
//! canvas widget) and image space (pixels of the original bitmap), plus the
//! hit-test predicates used by the interaction layer.

use crate::models::annotation::Point;

/// A point in view space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub min: ViewPoint,
    pub max: ViewPoint,
}

impl ViewRect {
    pub fn from_center_size(center: ViewPoint, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            min: ViewPoint::new(center.x - half, center.y - half),
            max: ViewPoint::new(center.x + half, center.y + half),
        }
    }

    /// Half-open containment, matching image-space rectangles.
    pub fn contains(&self, point: ViewPoint) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}

/// Conversion between view and image space for one `(scale, origin)` pair.
///
/// `origin` is where the image's `(0, 0)` pixel lands in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapper {
    pub scale: f64,
    pub origin: ViewPoint,
}

impl Mapper {
    pub fn new(scale: f64, origin: ViewPoint) -> Self {
        Self { scale, origin }
    }

    /// `image = ⌊(view - origin) / scale⌋`
    pub fn to_image(&self, view: ViewPoint) -> Point {
        Point::new(
            ((view.x - self.origin.x) / self.scale).floor() as i32,
            ((view.y - self.origin.y) / self.scale).floor() as i32,
        )
    }

    /// `view = image * scale + origin`
    pub fn to_view(&self, image: Point) -> ViewPoint {
        ViewPoint::new(
            image.x as f64 * self.scale + self.origin.x,
            image.y as f64 * self.scale + self.origin.y,
        )
    }
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(vertices: &[Point], point: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let (px, py) = (point.x as f64, point.y as f64);
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].x as f64, vertices[i].y as f64);
        let (xj, yj) = (vertices[j].x as f64, vertices[j].y as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Bounding-box top-left of a vertex list.
pub fn top_left(points: &[ViewPoint]) -> Option<ViewPoint> {
    let first = points.first()?;
    Some(points.iter().fold(*first, |acc, p| {
        ViewPoint::new(acc.x.min(p.x), acc.y.min(p.y))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapper = Mapper::new(1.0, ViewPoint::default());
        assert_eq!(mapper.to_image(ViewPoint::new(50.0, 75.0)), Point::new(50, 75));
        assert_eq!(mapper.to_view(Point::new(50, 75)), ViewPoint::new(50.0, 75.0));
    }

    #[test]
    fn test_mapping_with_scale_and_origin() {
        let mapper = Mapper::new(2.0, ViewPoint::new(-30.0, -10.0));
        assert_eq!(mapper.to_image(ViewPoint::new(10.0, 10.0)), Point::new(20, 10));
        assert_eq!(mapper.to_view(Point::new(20, 10)), ViewPoint::new(10.0, 10.0));
        // Sub-pixel view positions truncate down.
        assert_eq!(mapper.to_image(ViewPoint::new(11.9, 11.9)), Point::new(20, 10));
    }

    #[test]
    fn test_roundtrip_within_one_pixel() {
        let origins = [(0.0, 0.0), (-137.0, -42.0), (25.0, -300.0)];
        let points = [(0, 0), (1, 1), (333, 777), (1919, 1079), (-5, 12)];
        let mut scale = 0.1;
        while scale <= 3.0 + 1e-9 {
            for (ox, oy) in origins {
                let mapper = Mapper::new(scale, ViewPoint::new(ox, oy));
                for (x, y) in points {
                    let image = Point::new(x, y);
                    let back = mapper.to_image(mapper.to_view(image));
                    assert!(
                        (back.x - x).abs() <= 1 && (back.y - y).abs() <= 1,
                        "scale {} origin ({}, {}): {:?} -> {:?}",
                        scale,
                        ox,
                        oy,
                        image,
                        back
                    );
                }
            }
            scale += 0.1;
        }
    }

    #[test]
    fn test_polygon_contains_even_odd() {
        let triangle = [Point::new(0, 0), Point::new(10, 0), Point::new(5, 10)];
        assert!(polygon_contains(&triangle, Point::new(5, 3)));
        assert!(!polygon_contains(&triangle, Point::new(9, 9)));
        assert!(!polygon_contains(&triangle[..2], Point::new(5, 0)));
    }

    #[test]
    fn test_polygon_contains_self_intersecting() {
        // Bow-tie: both lobes are inside, the notch between them is not.
        let bowtie = [Point::new(0, 0), Point::new(10, 10), Point::new(10, 0), Point::new(0, 10)];
        assert!(polygon_contains(&bowtie, Point::new(2, 5)));
        assert!(!polygon_contains(&bowtie, Point::new(5, 1)));
    }

    #[test]
    fn test_handle_rect_contains() {
        let rect = ViewRect::from_center_size(ViewPoint::new(100.0, 100.0), 8.0);
        assert!(rect.contains(ViewPoint::new(96.0, 96.0)));
        assert!(rect.contains(ViewPoint::new(103.5, 103.5)));
        assert!(!rect.contains(ViewPoint::new(104.0, 100.0)));
    }

    #[test]
    fn test_top_left() {
        let points = [ViewPoint::new(5.0, 1.0), ViewPoint::new(2.0, 8.0)];
        assert_eq!(top_left(&points), Some(ViewPoint::new(2.0, 1.0)));
        assert_eq!(top_left(&[]), None);
    }
}
