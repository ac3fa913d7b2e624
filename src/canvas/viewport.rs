// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport controller: zoom, pan and the visible crop of the scaled image.
//!
//! `offset` is the top-left corner of the visible crop inside the image
//! scaled by `scale`. It is kept clamped so the crop never leaves the
//! scaled image.

use crate::config::CanvasConfig;
use crate::models::annotation::Point;
use crate::util::geometry::{Mapper, ViewPoint};
use image::RgbaImage;

/// Direction of a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

/// A region of the scaled image, in scaled-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

pub struct Viewport {
    scale: f64,
    offset: Point,
    base_image: Option<RgbaImage>,
    view_size: (i32, i32),
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
}

impl Viewport {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            scale: 1.0,
            offset: Point::default(),
            base_image: None,
            view_size: (0, 0),
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_step: config.zoom_step,
        }
    }

    /// Replace the displayed bitmap and reset zoom and pan.
    pub fn set_image(&mut self, image: RgbaImage) {
        log::debug!("Viewport image {}x{}", image.width(), image.height());
        self.base_image = Some(image);
        self.fit_to_view();
    }

    pub fn clear_image(&mut self) {
        self.base_image = None;
        self.scale = 1.0;
        self.offset = Point::default();
    }

    pub fn has_image(&self) -> bool {
        self.base_image.is_some()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.base_image.as_ref()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn view_size(&self) -> (i32, i32) {
        self.view_size
    }

    /// Update the widget size; the view is re-fitted when it changes.
    pub fn set_view_size(&mut self, width: i32, height: i32) {
        let size = (width.max(0), height.max(0));
        if size == self.view_size {
            return;
        }
        self.view_size = size;
        if self.has_image() {
            self.fit_to_view();
        }
    }

    pub fn fit_to_view(&mut self) {
        self.scale = 1.0;
        self.offset = Point::default();
        self.clamp_offset();
    }

    /// Step the scale, keeping the image point under `focus` in place.
    ///
    /// Returns `false` when nothing changed (no image or scale at its limit).
    pub fn zoom(&mut self, direction: Zoom, focus: ViewPoint) -> bool {
        if !self.has_image() {
            return false;
        }

        let step = match direction {
            Zoom::In => self.zoom_step,
            Zoom::Out => -self.zoom_step,
        };
        let old_scale = self.scale;
        let new_scale = (old_scale + step).clamp(self.min_scale, self.max_scale);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            return false;
        }

        let factor = new_scale / old_scale;
        self.scale = new_scale;
        self.offset = Point::new(
            ((self.offset.x as f64 + focus.x) * factor - focus.x).round() as i32,
            ((self.offset.y as f64 + focus.y) * factor - focus.y).round() as i32,
        );
        self.clamp_offset();

        log::debug!("Zoom {:.2} -> {:.2}, offset {:?}", old_scale, new_scale, self.offset);
        true
    }

    /// Drag the image by `delta` view pixels.
    pub fn pan(&mut self, delta: Point) {
        if !self.has_image() {
            return;
        }
        self.offset = Point::new(self.offset.x - delta.x, self.offset.y - delta.y);
        self.clamp_offset();
    }

    /// Size of the base image at the current scale.
    pub fn scaled_size(&self) -> Option<(i32, i32)> {
        let image = self.base_image.as_ref()?;
        Some((
            (image.width() as f64 * self.scale).round() as i32,
            (image.height() as f64 * self.scale).round() as i32,
        ))
    }

    /// The crop of the scaled image shown in the widget.
    pub fn visible_crop(&self) -> Option<Crop> {
        self.scaled_size()?;
        Some(Crop {
            x: self.offset.x,
            y: self.offset.y,
            width: self.view_size.0,
            height: self.view_size.1,
        })
    }

    /// Mapper between widget and image pixels for the current state.
    pub fn mapper(&self) -> Mapper {
        Mapper::new(
            self.scale,
            ViewPoint::new(-self.offset.x as f64, -self.offset.y as f64),
        )
    }

    fn clamp_offset(&mut self) {
        let Some((scaled_width, scaled_height)) = self.scaled_size() else {
            return;
        };
        let (view_width, view_height) = self.view_size;
        self.offset = Point::new(
            self.offset.x.min(scaled_width - view_width).max(0),
            self.offset.y.min(scaled_height - view_height).max(0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(image: (u32, u32), view: (i32, i32)) -> Viewport {
        let mut viewport = Viewport::new(&CanvasConfig::default());
        viewport.set_view_size(view.0, view.1);
        viewport.set_image(RgbaImage::new(image.0, image.1));
        viewport
    }

    #[test]
    fn test_new_image_resets_view() {
        let mut viewport = viewport((1000, 800), (400, 300));
        viewport.zoom(Zoom::In, ViewPoint::new(200.0, 150.0));
        viewport.pan(Point::new(-50, -50));

        viewport.set_image(RgbaImage::new(640, 480));
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.offset(), Point::new(0, 0));
    }

    #[test]
    fn test_zoom_clamped_to_limits() {
        let mut viewport = viewport((1000, 800), (400, 300));
        for _ in 0..100 {
            viewport.zoom(Zoom::In, ViewPoint::default());
        }
        assert!((viewport.scale() - 3.0).abs() < 1e-9);
        assert!(!viewport.zoom(Zoom::In, ViewPoint::default()));

        for _ in 0..100 {
            viewport.zoom(Zoom::Out, ViewPoint::default());
        }
        assert!((viewport.scale() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_focus_point_fixed() {
        let mut viewport = viewport((1000, 800), (400, 300));
        viewport.pan(Point::new(-100, -100));
        let focus = ViewPoint::new(200.0, 150.0);
        let before = viewport.mapper().to_image(focus);

        assert!(viewport.zoom(Zoom::In, focus));
        let after = viewport.mapper().to_image(focus);
        assert!((before.x - after.x).abs() <= 1);
        assert!((before.y - after.y).abs() <= 1);
    }

    #[test]
    fn test_zoom_in_then_out_restores_view() {
        let mut viewport = viewport((1000, 800), (400, 300));
        viewport.pan(Point::new(-100, -100));
        let original_offset = viewport.offset();
        let focus = ViewPoint::new(200.0, 150.0);

        viewport.zoom(Zoom::In, focus);
        viewport.zoom(Zoom::Out, focus);

        assert!((viewport.scale() - 1.0).abs() < 1e-9);
        assert!((viewport.offset().x - original_offset.x).abs() <= 1);
        assert!((viewport.offset().y - original_offset.y).abs() <= 1);
    }

    #[test]
    fn test_pan_far_out_stays_in_bounds() {
        let mut viewport = viewport((1000, 800), (400, 300));
        viewport.zoom(Zoom::In, ViewPoint::default());
        let (scaled_width, scaled_height) = viewport.scaled_size().unwrap();

        for delta in [Point::new(-100_000, -100_000), Point::new(100_000, 100_000), Point::new(-100_000, 50_000)] {
            viewport.pan(delta);
            let crop = viewport.visible_crop().unwrap();
            assert!(crop.x >= 0 && crop.y >= 0);
            assert!(crop.x <= scaled_width - crop.width);
            assert!(crop.y <= scaled_height - crop.height);
        }
    }

    #[test]
    fn test_small_image_crop_at_origin() {
        let mut viewport = viewport((100, 80), (400, 300));
        viewport.pan(Point::new(-30, -30));
        assert_eq!(
            viewport.visible_crop(),
            Some(Crop { x: 0, y: 0, width: 400, height: 300 })
        );
    }

    #[test]
    fn test_no_image_is_noop() {
        let mut viewport = Viewport::new(&CanvasConfig::default());
        viewport.set_view_size(400, 300);
        assert!(!viewport.zoom(Zoom::In, ViewPoint::default()));
        viewport.pan(Point::new(10, 10));
        assert_eq!(viewport.offset(), Point::new(0, 0));
        assert_eq!(viewport.visible_crop(), None);
    }

    #[test]
    fn test_resize_refits() {
        let mut viewport = viewport((1000, 800), (400, 300));
        viewport.zoom(Zoom::In, ViewPoint::new(100.0, 100.0));
        viewport.set_view_size(500, 300);
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.offset(), Point::new(0, 0));
    }
}
