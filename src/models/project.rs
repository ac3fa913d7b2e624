// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! This module mirrors the project files written by the project and
//! distribution screens (`projects.json` and `<project>.json`), and
//! defines the [`ActiveContext`] snapshot handed to the annotation canvas.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// A named, colored annotation category scoped to one subproject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationClass {
    pub name: String,
    pub color: String,
}

impl AnnotationClass {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// An entry of `projects.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
}

/// Contents of `<project>.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub subprojects: Vec<SubprojectData>,
    /// Workflow buckets keyed by subproject name.
    #[serde(default)]
    pub frames: HashMap<String, FrameBuckets>,
}

impl ProjectData {
    pub fn subproject(&self, name: &str) -> Option<&SubprojectData> {
        self.subprojects.iter().find(|s| s.name == name)
    }

    /// Folders currently being annotated for a subproject, sorted by name.
    pub fn in_progress_folders(&self, subproject: &str) -> Vec<(&str, &FolderEntry)> {
        self.frames
            .get(subproject)
            .map(|buckets| {
                buckets
                    .in_progress
                    .iter()
                    .map(|(name, folder)| (name.as_str(), folder))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubprojectData {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<AnnotationClass>,
}

/// Workflow buckets of one subproject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameBuckets {
    #[serde(default)]
    pub unassigned: BTreeMap<String, FolderEntry>,
    #[serde(default)]
    pub in_progress: BTreeMap<String, FolderEntry>,
    #[serde(default)]
    pub in_dataset: BTreeMap<String, FolderEntry>,
}

/// An image folder allocated to a bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderEntry {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Read-only snapshot of the upstream selection the canvas works against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveContext {
    pub project: String,
    pub subproject: String,
    pub classes: Vec<AnnotationClass>,
    pub image_files: Vec<PathBuf>,
    /// Where `<image-stem>.json` files for this subproject are written.
    pub annotations_dir: PathBuf,
}

impl ActiveContext {
    pub fn has_subproject(&self) -> bool {
        !self.subproject.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_data_tolerates_missing_sections() {
        let data: ProjectData = serde_json::from_str(r#"{"name": "p", "created": "2025"}"#).unwrap();
        assert!(data.subprojects.is_empty());
        assert!(data.in_progress_folders("any").is_empty());
    }

    #[test]
    fn test_in_progress_folders_sorted() {
        let json = r##"{
            "subprojects": [{"name": "cars", "classes": [{"name": "car", "color": "#ff0000"}]}],
            "frames": {"cars": {
                "unassigned": {"z": {"path": "/z", "total": 1, "files": ["/z/1.png"]}},
                "in_progress": {
                    "b": {"path": "/b", "total": 1, "files": ["/b/1.png"]},
                    "a": {"path": "/a", "total": 2, "files": ["/a/1.png", "/a/2.png"]}
                }
            }}
        }"##;
        let data: ProjectData = serde_json::from_str(json).unwrap();
        let folders = data.in_progress_folders("cars");
        let names: Vec<&str> = folders.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(folders[0].1.files.len(), 2);
        assert_eq!(data.subproject("cars").unwrap().classes[0].name, "car");
    }
}
