// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Read-only access to the project workspace.
//!
//! The workspace lives under the configured data directory:
//! `projects.json` lists the projects and `<project>.json` holds the
//! subprojects, their classes and the frame folders of each workflow bucket.

use super::media;
use crate::models::project::{ActiveContext, ProjectData, ProjectEntry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const PROJECT_INDEX_FILE: &str = "projects.json";

/// Projects listed in `projects.json`. A missing index means no projects.
pub fn load_project_index(data_dir: &Path) -> Result<Vec<ProjectEntry>> {
    let path = data_dir.join(PROJECT_INDEX_FILE);
    if !path.exists() {
        log::warn!("No project index at {}", path.display());
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let projects: Vec<ProjectEntry> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to load the project list from {}", path.display()))?;

    log::info!("Found {} projects in {}", projects.len(), data_dir.display());
    Ok(projects)
}

/// Contents of `<project>.json`. A missing file reads as an empty project.
pub fn load_project(data_dir: &Path, name: &str) -> Result<ProjectData> {
    let path = data_dir.join(format!("{}.json", name));
    if !path.exists() {
        log::warn!("Project file {} not found", path.display());
        return Ok(ProjectData::default());
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to load project data from {}", path.display()))
}

/// Where annotations of a subproject are written.
pub fn annotations_dir(data_dir: &Path, project: &str, subproject: &str) -> PathBuf {
    data_dir.join(project).join(subproject).join("annotations")
}

/// Snapshot of a workspace selection for the canvas.
///
/// `folder` names an in-progress folder of `subproject`; an unknown or
/// absent folder yields an empty image list. Files that are not images
/// are skipped.
pub fn build_context(
    data_dir: &Path,
    project: &str,
    data: &ProjectData,
    subproject: &str,
    folder: Option<&str>,
) -> ActiveContext {
    let classes = data
        .subproject(subproject)
        .map(|s| s.classes.clone())
        .unwrap_or_default();

    let image_files = folder
        .and_then(|folder| {
            data.in_progress_folders(subproject)
                .into_iter()
                .find(|(name, _)| *name == folder)
        })
        .map(|(_, entry)| {
            entry
                .files
                .iter()
                .map(PathBuf::from)
                .filter(|path| media::is_image_file(path))
                .collect()
        })
        .unwrap_or_default();

    ActiveContext {
        project: project.to_string(),
        subproject: subproject.to_string(),
        classes,
        image_files,
        annotations_dir: annotations_dir(data_dir, project, subproject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::AnnotationClass;

    const PROJECT: &str = r##"{
        "subprojects": [
            {"name": "day", "classes": [{"name": "car", "color": "#ff0000"}], "created": "2024-01-01"},
            {"name": "night"}
        ],
        "frames": {
            "day": {
                "unassigned": {"raw": {"path": "/frames/raw", "total": 9, "files": []}},
                "in_progress": {
                    "batch_02": {"path": "/frames/b2", "total": 2, "files": ["/frames/b2/0001.png", "/frames/b2/notes.txt"]},
                    "batch_01": {"path": "/frames/b1", "total": 2, "files": ["/frames/b1/0001.png", "/frames/b1/0002.png"]}
                }
            }
        }
    }"##;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_INDEX_FILE), r#"[{"name": "traffic", "description": "x"}]"#).unwrap();
        std::fs::write(dir.path().join("traffic.json"), PROJECT).unwrap();
        dir
    }

    #[test]
    fn test_load_index_and_project() {
        let dir = workspace();
        let projects = load_project_index(dir.path()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "traffic");

        let data = load_project(dir.path(), "traffic").unwrap();
        assert_eq!(data.subprojects.len(), 2);
        assert!(data.subproject("night").unwrap().classes.is_empty());
        let folders: Vec<&str> = data.in_progress_folders("day").into_iter().map(|(n, _)| n).collect();
        assert_eq!(folders, vec!["batch_01", "batch_02"]);
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_project_index(dir.path()).unwrap().is_empty());
        assert!(load_project(dir.path(), "ghost").unwrap().subprojects.is_empty());
    }

    #[test]
    fn test_malformed_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_INDEX_FILE), "{not json").unwrap();
        assert!(load_project_index(dir.path()).is_err());
    }

    #[test]
    fn test_build_context() {
        let dir = workspace();
        let data = load_project(dir.path(), "traffic").unwrap();

        let context = build_context(dir.path(), "traffic", &data, "day", Some("batch_01"));
        assert_eq!(context.classes, vec![AnnotationClass::new("car", "#ff0000")]);
        assert_eq!(
            context.image_files,
            vec![PathBuf::from("/frames/b1/0001.png"), PathBuf::from("/frames/b1/0002.png")]
        );
        assert_eq!(context.annotations_dir, dir.path().join("traffic/day/annotations"));
        assert!(context.has_subproject());

        let filtered = build_context(dir.path(), "traffic", &data, "day", Some("batch_02"));
        assert_eq!(filtered.image_files, vec![PathBuf::from("/frames/b2/0001.png")]);

        let unassigned = build_context(dir.path(), "traffic", &data, "day", Some("raw"));
        assert!(unassigned.image_files.is_empty());
        let no_folder = build_context(dir.path(), "traffic", &data, "night", None);
        assert!(no_folder.image_files.is_empty());
        assert!(no_folder.classes.is_empty());
    }
}
