// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text-level helpers for Mermaid sources.
//!
//! There is no grammar here: sources are handled as lines plus identifier-scoped patterns.

pub mod annotation;
pub mod pattern;

pub use annotation::{
    format_annotation, parse_positions, upsert_position, AnnotationError, OverrideCache,
    PositionOverrides, POSITION_MARKER,
};
