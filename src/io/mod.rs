// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, annotation files and the project workspace.

pub mod media;
pub mod serialization;
pub mod workspace;
