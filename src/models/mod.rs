// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: annotation records, class colors and project files.

pub mod annotation;
pub mod color;
pub mod project;
