// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Point;

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom factor and pan offset of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: Point::ZERO,
        }
    }
}

impl Viewport {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_scale(self.scale + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_scale(self.scale - ZOOM_STEP)
    }

    /// Sets the scale, rounded to the zoom step and clamped to the supported range.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        let rounded = (scale * 10.0).round() / 10.0;
        self.scale = rounded.clamp(MIN_SCALE, MAX_SCALE);
        self.scale
    }

    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Back to scale 1 with no pan offset.
    pub fn fit(&mut self) {
        *self = Self::default();
    }
}
