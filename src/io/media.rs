// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Frames are decoded with the `image` crate and converted to RGBA8, the
//! layout both the canvas and egui textures expect.

use crate::error::CanvasError;
use image::RgbaImage;
use std::path::Path;

/// Extensions of frames the canvas can display.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Case-insensitive extension check against [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Decode the image at `path`.
pub fn load_image(path: &Path) -> Result<RgbaImage, CanvasError> {
    if !path.exists() {
        return Err(CanvasError::ImageMissing(path.to_path_buf()));
    }

    let decoded = image::open(path).map_err(|e| CanvasError::ImageUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();

    log::info!("Loaded image {} ({}x{})", path.display(), rgba.width(), rgba.height());
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut source = RgbaImage::new(4, 3);
        source.put_pixel(1, 2, image::Rgba([10, 20, 30, 255]));
        source.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(1, 2), &image::Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("frames/0001.PNG")));
        assert!(is_image_file(Path::new("a.b.jpeg")));
        assert!(!is_image_file(Path::new("frames/notes.txt")));
        assert!(!is_image_file(Path::new("frames/README")));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");
        assert!(matches!(load_image(&path), Err(CanvasError::ImageMissing(p)) if p == path));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_image(&path), Err(CanvasError::ImageUnreadable { .. })));
    }
}
