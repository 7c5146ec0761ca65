// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core value types.
//!
//! The source document is the single source of truth; everything visual is re-derived from it.

pub mod diagram_type;
pub mod document;
pub mod element;
pub mod history;
pub mod theme;

pub use diagram_type::{DiagramType, ParseDiagramTypeError, RuleFamily};
pub use document::SourceDocument;
pub use element::{
    ElementCategory, ElementId, ElementIdError, Point, SelectedElement, VisualElement,
};
pub use history::{HistoryLog, SourceBuffer};
pub use theme::{ConfigError, CurveStyle, ThemeConfig};
