// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use smol_str::SmolStr;

/// Stable identifier of a diagram element, as written in the source text.
///
/// Ids are normalized from renderer-generated DOM ids (`flowchart-A-0` → `A`). Edge labels are
/// addressed by their sequential bind-time index (`"0"`, `"1"`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(SmolStr);

impl ElementId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ElementIdError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(ElementIdError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ElementIdError::ContainsWhitespace);
        }
        Ok(Self(SmolStr::new(value)))
    }

    pub fn from_index(index: usize) -> Self {
        Self(SmolStr::new(index.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric index for edge ids; `None` for named elements.
    pub fn as_index(&self) -> Option<usize> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ElementId {
    type Err = ElementIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ElementIdError {
    #[error("element id must not be empty")]
    Empty,
    #[error("element id must not contain whitespace")]
    ContainsWhitespace,
}

/// Semantic category assigned by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// Flowchart-style boxes.
    Node,
    /// Sequence participants (and their lifelines).
    Actor,
    /// Labeled connections.
    Edge,
    Other,
}

impl ElementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Actor => "actor",
            Self::Edge => "edge",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 2D value in source-space units (offsets, translations) or pixels (pointer positions).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale_down(self, factor: f64) -> Self {
        Self::new(self.x / factor, self.y / factor)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A rendered, classified element. Recreated on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub id: ElementId,
    pub category: ElementCategory,
    pub display_text: String,
    /// Translation as rendered, including any applied position override.
    pub transform: Point,
}

/// The element currently opened for editing. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedElement {
    pub id: ElementId,
    pub category: ElementCategory,
    pub text: Option<String>,
}

impl SelectedElement {
    pub fn new(id: ElementId, category: ElementCategory, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            category,
            text: (!text.is_empty()).then_some(text),
        }
    }
}
