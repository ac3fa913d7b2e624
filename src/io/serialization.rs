// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation persistence.
//!
//! Annotations are written as one pretty-printed JSON array per source
//! image, named after the image's file stem.

use crate::models::annotation::Annotation;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Write `annotations` grouped by image into `dir`, creating it if needed.
///
/// Existing files for the same image stems are overwritten, including
/// files written earlier in the same call for another image with that stem.
/// Files written before a failure are left in place. Returns the written
/// paths in image path order.
pub fn save_annotations(annotations: &[Annotation], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut by_image: BTreeMap<&Path, Vec<&Annotation>> = BTreeMap::new();
    for annotation in annotations {
        by_image
            .entry(annotation.image_path.as_path())
            .or_default()
            .push(annotation);
    }

    let mut written = Vec::with_capacity(by_image.len());
    let mut seen = HashSet::new();
    for (image_path, group) in by_image {
        let stem = image_path
            .file_stem()
            .with_context(|| format!("Image path {} has no file name", image_path.display()))?;
        let mut file_name = stem.to_os_string();
        file_name.push(".json");
        let path = dir.join(file_name);
        if !seen.insert(path.clone()) {
            log::warn!(
                "{} replaces annotations saved for another image with the same stem",
                image_path.display()
            );
        }

        let json = serde_json::to_string_pretty(&group)?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        log::debug!("Wrote {} annotations to {}", group.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Point, Rect, Shape};

    #[test]
    fn test_groups_by_image() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = vec![
            Annotation::new(Shape::Rect(Rect::new(1, 2, 30, 40)), "car", "#ff0000", "frames/b.jpg"),
            Annotation::new(Shape::Point(Point::new(5, 6)), "sign", "blue", "frames/a.png"),
            Annotation::new(Shape::Point(Point::new(7, 8)), "sign", "blue", "frames/b.jpg"),
            Annotation::new(Shape::Point(Point::new(9, 9)), "sign", "blue", "frames/c.0001.png"),
        ];

        let written = save_annotations(&annotations, dir.path()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("a.json"),
                dir.path().join("b.json"),
                dir.path().join("c.0001.json"),
            ]
        );

        let b: Vec<Annotation> = serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(b, vec![annotations[0].clone(), annotations[2].clone()]);
    }

    #[test]
    fn test_pretty_utf8_output() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = vec![Annotation::new(
            Shape::Point(Point::new(1, 1)),
            "дорожный знак",
            "#00ff00",
            "кадр.png",
        )];

        let written = save_annotations(&annotations, &dir.path().join("nested/dir")).unwrap();
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("\"class\": \"дорожный знак\""));
        assert!(text.starts_with("[\n  {"));
        assert_eq!(written[0].file_name().unwrap(), "кадр.json");
    }

    #[test]
    fn test_failed_write_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b.json")).unwrap();
        let annotations = vec![
            Annotation::new(Shape::Point(Point::new(1, 1)), "x", "red", "frames/a.png"),
            Annotation::new(Shape::Point(Point::new(2, 2)), "x", "red", "frames/b.png"),
        ];

        assert!(save_annotations(&annotations, dir.path()).is_err());
        let saved: Vec<Annotation> =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("a.json")).unwrap()).unwrap();
        assert_eq!(saved, vec![annotations[0].clone()]);
    }

    #[test]
    fn test_same_stem_last_image_wins() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = vec![
            Annotation::new(Shape::Point(Point::new(1, 1)), "x", "red", "frames/0001.png"),
            Annotation::new(Shape::Point(Point::new(2, 2)), "x", "red", "frames/0001.jpg"),
        ];

        let written = save_annotations(&annotations, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("0001.json"), dir.path().join("0001.json")]);

        let saved: Vec<Annotation> = serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(saved, vec![annotations[0].clone()]);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "stale").unwrap();
        let annotations = vec![Annotation::new(Shape::Point(Point::new(1, 1)), "x", "red", "a.png")];

        save_annotations(&annotations, dir.path()).unwrap();
        let saved: Vec<Annotation> =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("a.json")).unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
    }
}
