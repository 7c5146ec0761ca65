// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Position-override annotations embedded in the source as Mermaid comments.
//!
//! Grammar (one per line): `%% position: <id> <x> <y>` where `<id>` is word characters and
//! hyphens and `<x>`/`<y>` are signed decimals. Values are written with one decimal digit.
//!
//! When an id is annotated more than once, parsing keeps the last occurrence; `upsert_position`
//! rewrites the first occurrence in place and drops the rest.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use super::pattern::{append_line, escape};
use crate::model::{ElementId, Point, SourceDocument};

pub const POSITION_MARKER: &str = "%% position:";

fn annotation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"%%\s*position:\s*([\w-]+)\s+([-\d.]+)\s+([-\d.]+)").expect("annotation regex")
    })
}

/// Same character class as the id capture of [`annotation_regex`].
fn is_annotatable(id: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w-]+$").expect("annotation id regex"))
        .is_match(id)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("element id '{id}' cannot be written as a position annotation (expected word characters and '-')")]
    InvalidIdentifier { id: String },
}

/// Offsets keyed by element id, derived from the annotation lines of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionOverrides {
    offsets: HashMap<ElementId, Point>,
}

impl PositionOverrides {
    pub fn get(&self, id: &str) -> Option<Point> {
        self.offsets.get(id).copied()
    }

    /// The stored offset, or the origin when the element was never moved.
    pub fn offset_or_zero(&self, id: &str) -> Point {
        self.get(id).unwrap_or(Point::ZERO)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &Point)> {
        self.offsets.iter()
    }
}

/// Collects every annotation in `source`. Malformed numbers are skipped.
pub fn parse_positions(source: &str) -> PositionOverrides {
    let mut offsets = HashMap::new();
    for caps in annotation_regex().captures_iter(source) {
        let (Ok(x), Ok(y)) = (caps[2].parse::<f64>(), caps[3].parse::<f64>()) else {
            continue;
        };
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let Ok(id) = ElementId::new(&caps[1]) else {
            continue;
        };
        offsets.insert(id, Point::new(x, y));
    }
    PositionOverrides { offsets }
}

pub fn format_annotation(id: &str, offset: Point) -> String {
    format!("{POSITION_MARKER} {id} {:.1} {:.1}", offset.x, offset.y)
}

/// Sets the offset for `id`, replacing its annotation in place or appending a new one.
pub fn upsert_position(source: &str, id: &str, offset: Point) -> Result<String, AnnotationError> {
    if !is_annotatable(id) {
        return Err(AnnotationError::InvalidIdentifier { id: id.to_owned() });
    }

    let annotation = format_annotation(id, offset);
    let pattern = format!(r"%%\s*position:\s*{}\s+[-\d.]+\s+[-\d.]+", escape(id));
    let re = Regex::new(&pattern).expect("escaped annotation pattern is valid");

    let mut replaced = false;
    let mut duplicates = 0usize;
    let mut lines = Vec::new();
    for line in source.split('\n') {
        if !re.is_match(line) {
            lines.push(line.to_owned());
            continue;
        }
        if replaced {
            duplicates += 1;
            continue;
        }
        lines.push(re.replace(line, NoExpand(&annotation)).into_owned());
        replaced = true;
    }

    if !replaced {
        debug!(%id, "appending position annotation");
        return Ok(append_line(source, &annotation));
    }
    if duplicates > 0 {
        debug!(%id, duplicates, "dropped duplicate position annotations");
    }
    Ok(lines.join("\n"))
}

/// Read-through cache of the overrides for the most recently queried document.
#[derive(Debug, Default, Clone)]
pub struct OverrideCache {
    source: Option<SourceDocument>,
    overrides: PositionOverrides,
}

impl OverrideCache {
    pub fn get(&mut self, doc: &SourceDocument) -> &PositionOverrides {
        if self.source.as_ref() != Some(doc) {
            self.overrides = parse_positions(doc);
            self.source = Some(doc.clone());
        }
        &self.overrides
    }
}
