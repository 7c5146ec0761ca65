// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text mutation operations for diagram sources.
//!
//! Every operation is a pure function from the current source to a new source. Edits are
//! textual best-effort: a rule that finds no matching construct leaves the text untouched and
//! reports `EditStatus::Unchanged` (or `Unsupported` when the diagram type has no rule for that
//! edit at all) instead of failing. The only hard failure is an edge deletion without a label.

use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::format::pattern::{append_line, escape, has_arrow, remove_lines, replace_scoped};
use crate::format::{upsert_position, AnnotationError};
use crate::model::{DiagramType, ElementCategory, ElementId, Point, SelectedElement};

mod rules;

pub use rules::{rules_for, DiagramRules, GraphRules, PlainRules, SequenceRules};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

/// Requested style changes. Empty fields are left out of the generated directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylePatch {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub text_color: Option<String>,
    pub border_style: Option<BorderStyle>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.fill).is_none()
            && non_empty(&self.stroke).is_none()
            && non_empty(&self.text_color).is_none()
            && self.border_style.is_none()
    }

    /// CSS-like declarations in directive order; always ends with the fixed border width.
    pub fn declarations(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(5);
        if let Some(fill) = non_empty(&self.fill) {
            out.push(format!("fill:{fill}"));
        }
        if let Some(stroke) = non_empty(&self.stroke) {
            out.push(format!("stroke:{stroke}"));
        }
        if let Some(color) = non_empty(&self.text_color) {
            out.push(format!("color:{color}"));
        }
        if self.border_style == Some(BorderStyle::Dashed) {
            out.push("stroke-dasharray: 5 5".to_owned());
        }
        out.push("stroke-width:2px".to_owned());
        out
    }
}

/// Label and style changes for a node or actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPatch {
    pub label: Option<String>,
    pub style: StylePatch,
}

/// Label, arrow and color changes for an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub label: Option<String>,
    pub arrow: Option<String>,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Element(ElementPatch),
    Edge(EdgePatch),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStatus {
    Changed,
    /// A rule exists but matched nothing.
    Unchanged,
    /// No rule for this edit kind in this diagram type.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub text: String,
    pub status: EditStatus,
}

impl EditResult {
    fn resolve(source: &str, text: String, attempted: bool) -> Self {
        let status = if text != source {
            EditStatus::Changed
        } else if attempted {
            EditStatus::Unchanged
        } else {
            EditStatus::Unsupported
        };
        Self { text, status }
    }

    pub fn is_changed(&self) -> bool {
        self.status == EditStatus::Changed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("cannot delete edge {edge_id} reliably: it has no label text")]
    AmbiguousDeletion { edge_id: ElementId },
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// Applies `edit` to `target` using the rule set of `kind`.
pub fn apply_edit(
    source: &str,
    kind: DiagramType,
    target: &SelectedElement,
    edit: &Edit,
) -> Result<EditResult, MutationError> {
    let rules = rules_for(kind);
    let result = match edit {
        Edit::Element(patch) => patch_element(source, rules, target.id.as_str(), patch),
        Edit::Edge(patch) => patch_edge(source, rules, target, patch),
        Edit::Delete => delete(source, rules, target)?,
    };
    debug!(
        kind = %kind,
        id = %target.id,
        category = %target.category,
        status = ?result.status,
        "text edit applied"
    );
    Ok(result)
}

/// Records a new absolute offset for `id` as a position annotation.
pub fn move_element(source: &str, id: &str, offset: Point) -> Result<EditResult, MutationError> {
    let text = upsert_position(source, id, offset)?;
    Ok(EditResult::resolve(source, text, true))
}

fn patch_element(
    source: &str,
    rules: &dyn DiagramRules,
    id: &str,
    patch: &ElementPatch,
) -> EditResult {
    let mut text = source.to_owned();
    let mut attempted = false;

    if let Some(label) = non_empty(&patch.label) {
        if let Some(renamed) = rules.rename_label(&text, id, label) {
            attempted = true;
            text = renamed;
        }
    }

    if !patch.style.is_empty() {
        if let Some(styled) = rules.restyle(&text, id, &patch.style) {
            attempted = true;
            text = styled;
        }
    }

    EditResult::resolve(source, text, attempted)
}

fn edge_pipe_regex(old_label: &str) -> Regex {
    let pattern = format!(r"([-=.>]+)(\s*)(\|)({})(\|)", escape(old_label));
    Regex::new(&pattern).expect("escaped edge pattern is valid")
}

fn patch_edge(
    source: &str,
    rules: &dyn DiagramRules,
    target: &SelectedElement,
    patch: &EdgePatch,
) -> EditResult {
    let mut text = source.to_owned();
    let mut attempted = false;
    let new_label = non_empty(&patch.label);
    let new_arrow = non_empty(&patch.arrow);

    if let Some(old_label) = non_empty(&target.text) {
        if new_label.is_some() || new_arrow.is_some() {
            attempted = true;
            text = relabel_edge(&text, old_label, new_label, new_arrow);
        }
    }

    if let Some(stroke) = non_empty(&patch.stroke) {
        if rules.styles_edges() {
            if let Some(index) = target.id.as_index() {
                attempted = true;
                text = restyle_link(&text, index, stroke);
            }
        }
    }

    EditResult::resolve(source, text, attempted)
}

/// Rewrites the first `-->|old|` occurrence; falls back to a trailing `: old` label.
fn relabel_edge(source: &str, old: &str, label: Option<&str>, arrow: Option<&str>) -> String {
    let re = edge_pipe_regex(old);
    let mut done = false;
    let (text, count) = replace_scoped(source, &re, |caps| {
        if done {
            return None;
        }
        done = true;
        Some(format!(
            "{}{}|{}|",
            arrow.unwrap_or(&caps[1]),
            &caps[2],
            label.unwrap_or(&caps[4]),
        ))
    });
    if count > 0 {
        return text;
    }

    // `A --> B : old` (state/class/sequence). Only the label is rewritten: arrow tokens in these
    // diagrams carry cardinality/semantics that a flowchart arrow cannot express.
    let Some(label) = label else {
        return text;
    };
    let mut done = false;
    let lines = source
        .split('\n')
        .map(|line| {
            if done || !has_arrow(line) {
                return line.to_owned();
            }
            let Some(colon) = line.rfind(':') else {
                return line.to_owned();
            };
            if line[colon + 1..].trim() != old {
                return line.to_owned();
            }
            done = true;
            format!("{} {label}", &line[..=colon])
        })
        .collect::<Vec<_>>();
    lines.join("\n")
}

fn restyle_link(source: &str, index: usize, stroke: &str) -> String {
    let directive = Regex::new(&format!(r"^\s*linkStyle\s+{index}\s+")).expect("linkStyle regex");
    let text = remove_lines(source, |line| directive.is_match(line));
    append_line(&text, &format!("linkStyle {index} stroke:{stroke},stroke-width:2px,fill:none"))
}

fn delete(
    source: &str,
    rules: &dyn DiagramRules,
    target: &SelectedElement,
) -> Result<EditResult, MutationError> {
    if target.category == ElementCategory::Edge {
        let Some(label) = non_empty(&target.text) else {
            return Err(MutationError::AmbiguousDeletion {
                edge_id: target.id.clone(),
            });
        };
        let text = remove_lines(source, |line| has_arrow(line) && line.contains(label));
        return Ok(EditResult::resolve(source, text, true));
    }

    let text = rules.delete_element(source, target.id.as_str());
    Ok(EditResult::resolve(source, text, true))
}

fn graph_direction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(graph|flowchart)\s+(TD|TB|LR|RL)\b").expect("direction regex"))
}

fn state_direction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"direction\s+(LR|TB)").expect("state direction regex"))
}

/// Toggles a flowchart between vertical and horizontal layout (`stateDiagram-v2` via its
/// `direction` statement). `None` when the source has no rotatable header.
pub fn rotate_direction(source: &str) -> Option<String> {
    if let Some(caps) = graph_direction_regex().captures(source) {
        let next = match &caps[2] {
            "TD" | "TB" => "LR",
            _ => "TD",
        };
        let replacement = format!("{} {next}", &caps[1]);
        return Some(
            graph_direction_regex()
                .replace(source, NoExpand(&replacement))
                .into_owned(),
        );
    }

    if !source.contains("stateDiagram-v2") {
        return None;
    }
    if let Some(caps) = state_direction_regex().captures(source) {
        let next = if &caps[1] == "LR" { "TB" } else { "LR" };
        let replacement = format!("direction {next}");
        return Some(
            state_direction_regex()
                .replace(source, NoExpand(&replacement))
                .into_owned(),
        );
    }
    Some(source.replacen("stateDiagram-v2", "stateDiagram-v2\n    direction LR", 1))
}

/// Appends a tool snippet verbatim (snippets carry their own leading newline and indent).
pub fn insert_snippet(source: &str, snippet: &str) -> String {
    let mut out = String::with_capacity(source.len() + snippet.len());
    out.push_str(source);
    out.push_str(snippet);
    out
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
