// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the framelabel application.

pub mod browser;
pub mod canvas;
pub mod dialogs;
pub mod toolbar;

use crate::models::color::Rgba;

pub fn color32(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}
