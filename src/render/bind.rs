// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Post-render binding of the SVG tree.
//!
//! Binding runs once per successful render and does three things, in order:
//!
//! 1. shifts every element that has a stored position override by that offset (the override is
//!    added to the translation the renderer produced),
//! 2. classifies rendered elements into nodes, actors (plus their lifelines) and edge labels,
//! 3. records one [`Binding`] per interactive element so the host can route pointer events.
//!
//! Parsing uses `roxmltree`; the transform rewrite streams the original markup through
//! `lol_html`, matching elements by tag name and per-tag ordinal.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use lol_html::{element, rewrite_str, RewriteStrSettings};
use regex::Regex;
use roxmltree::{Document, Node, NodeId};
use tracing::debug;

use super::{RenderOutput, SvgSize};
use crate::format::PositionOverrides;
use crate::model::{ElementCategory, ElementId, Point, VisualElement};

/// Horizontal distance within which a vertical line counts as an actor's lifeline.
pub const LIFELINE_TOLERANCE: f64 = 10.0;

/// DOM id prefixes the renderer puts in front of source identifiers.
const ID_PREFIXES: [&str; 5] = ["flowchart-", "classId-", "state-", "entity-", "actor-"];

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("rendered markup is not well-formed")]
    Xml(#[from] roxmltree::Error),
    #[error("failed to apply position overrides")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Node,
    Actor,
    /// A vertical line under an actor. Clicks open the actor; it cannot be dragged.
    Lifeline,
    EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    pub dom_id: Option<String>,
    pub element: VisualElement,
    pub draggable: bool,
}

impl Binding {
    pub fn hit_target(&self) -> HitTarget {
        HitTarget {
            id: self.element.id.clone(),
            category: self.element.category,
            text: self.element.display_text.clone(),
            draggable: self.draggable,
            transform: self.element.transform,
        }
    }
}

/// What the pointer pressed on, as handed to the interaction controller.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTarget {
    pub id: ElementId,
    pub category: ElementCategory,
    pub text: String,
    pub draggable: bool,
    /// Translation as currently rendered (baseline plus stored override).
    pub transform: Point,
}

/// Rendered markup with overrides applied, plus its interactive elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundView {
    pub markup: String,
    pub size: SvgSize,
    pub bindings: Vec<Binding>,
}

impl BoundView {
    /// The first binding for `id` of the given kind.
    pub fn find(&self, kind: BindingKind, id: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.kind == kind && b.element.id.as_str() == id)
    }

    /// Edge label by bind-time index.
    pub fn edge(&self, index: usize) -> Option<&Binding> {
        self.bindings
            .iter()
            .filter(|b| b.kind == BindingKind::EdgeLabel)
            .nth(index)
    }

    pub fn elements(&self) -> impl Iterator<Item = &VisualElement> {
        self.bindings
            .iter()
            .filter(|b| b.kind != BindingKind::Lifeline)
            .map(|b| &b.element)
    }
}

fn translate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"translate\(\s*([-+\d.eE]+)(?:[\s,]+([-+\d.eE]+))?\s*\)")
            .expect("translate regex")
    })
}

pub(crate) fn parse_translate(transform: &str) -> Option<Point> {
    let caps = translate_regex().captures(transform)?;
    let x = caps[1].parse::<f64>().ok()?;
    let y = match caps.get(2) {
        Some(y) => y.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };
    Some(Point::new(x, y))
}

/// `transform` with its translation replaced by `to` (prepended when it has none).
pub(crate) fn with_translate(existing: Option<&str>, to: Point) -> String {
    let translate = format!("translate({}, {})", to.x, to.y);
    match existing {
        Some(value) if translate_regex().is_match(value) => translate_regex()
            .replace(value, regex::NoExpand(&translate))
            .into_owned(),
        Some(value) if !value.trim().is_empty() => format!("{translate} {value}"),
        _ => translate,
    }
}

fn has_class(node: Node<'_, '_>, token: &str) -> bool {
    node.attribute("class")
        .is_some_and(|class| class.split_whitespace().any(|t| t == token))
}

fn own_translate(node: Node<'_, '_>) -> Point {
    node.attribute("transform")
        .and_then(parse_translate)
        .unwrap_or(Point::ZERO)
}

fn accumulated_translate(node: Node<'_, '_>) -> Point {
    node.ancestors()
        .filter(Node::is_element)
        .fold(Point::ZERO, |acc, n| acc + own_translate(n))
}

fn number_attr(node: Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_owned()
}

fn first_descendant<'a, 'i>(
    node: Node<'a, 'i>,
    pred: impl Fn(Node<'a, 'i>) -> bool,
) -> Option<Node<'a, 'i>> {
    node.descendants().skip(1).filter(Node::is_element).find(|n| pred(*n))
}

fn tag_is(node: Node<'_, '_>, name: &str) -> bool {
    node.tag_name().name().eq_ignore_ascii_case(name)
}

/// Maps a renderer DOM id to the source identifier (`flowchart-A-0` → `A`).
pub fn normalize_dom_id(dom_id: &str) -> &str {
    let rest = ID_PREFIXES
        .iter()
        .filter_map(|prefix| dom_id.rfind(prefix).map(|at| &dom_id[at + prefix.len()..]))
        .next()
        .or_else(|| dom_id.split_once('-').map(|(_, rest)| rest))
        .unwrap_or(dom_id);

    match rest.rsplit_once('-') {
        Some((head, counter))
            if !head.is_empty()
                && !counter.is_empty()
                && counter.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => rest,
    }
}

fn element_id(node: Node<'_, '_>) -> Option<ElementId> {
    if let Some(data_id) = node.attribute("data-id") {
        return ElementId::new(data_id).ok();
    }
    let dom_id = node.attribute("id")?;
    ElementId::new(normalize_dom_id(dom_id)).ok()
}

fn actor_id(group: Node<'_, '_>, text: &str) -> Option<ElementId> {
    if let Some(id) = group.attribute("data-id").and_then(|v| ElementId::new(v).ok()) {
        return Some(id);
    }
    if let Some(id) = group
        .attribute("id")
        .and_then(|v| ElementId::new(normalize_dom_id(v)).ok())
    {
        return Some(id);
    }
    if let Some(name) = group
        .descendants()
        .filter(Node::is_element)
        .find_map(|n| n.attribute("name"))
    {
        return ElementId::new(name).ok();
    }
    ElementId::new(text).ok()
}

struct ActorAnchor {
    element: VisualElement,
    center_x: f64,
}

/// Per-tag ordinal key shared by the `roxmltree` walk and the `lol_html` rewrite.
type OrdinalKey = (String, usize);

struct Classifier<'a, 'i> {
    overrides: &'a PositionOverrides,
    ordinals: HashMap<NodeId, OrdinalKey>,
    bindings: Vec<Binding>,
    rewrites: HashMap<OrdinalKey, String>,
    actors: Vec<ActorAnchor>,
    seen_actor_groups: HashSet<NodeId>,
    doc: &'a Document<'i>,
}

impl<'a, 'i> Classifier<'a, 'i> {
    fn new(doc: &'a Document<'i>, overrides: &'a PositionOverrides) -> Self {
        let mut counters: HashMap<String, usize> = HashMap::new();
        let mut ordinals = HashMap::new();
        for node in doc.descendants().filter(Node::is_element) {
            let tag = node.tag_name().name().to_ascii_lowercase();
            let counter = counters.entry(tag.clone()).or_default();
            ordinals.insert(node.id(), (tag, *counter));
            *counter += 1;
        }
        Self {
            overrides,
            ordinals,
            bindings: Vec::new(),
            rewrites: HashMap::new(),
            actors: Vec::new(),
            seen_actor_groups: HashSet::new(),
            doc,
        }
    }

    /// Rendered transform of `node`, scheduling a rewrite when an override applies.
    fn placed(&mut self, node: Node<'_, '_>, id: &ElementId) -> Point {
        let baseline = own_translate(node);
        let Some(offset) = self.overrides.get(id.as_str()) else {
            return baseline;
        };
        let placed = baseline + offset;
        if let Some(key) = self.ordinals.get(&node.id()) {
            self.rewrites.insert(
                key.clone(),
                with_translate(node.attribute("transform"), placed),
            );
        }
        placed
    }

    fn push(&mut self, kind: BindingKind, node: Node<'_, '_>, element: VisualElement) {
        let draggable = matches!(kind, BindingKind::Node | BindingKind::Actor);
        self.bindings.push(Binding {
            kind,
            dom_id: node.attribute("id").map(str::to_owned),
            element,
            draggable,
        });
    }

    fn classify(&mut self) {
        let doc = self.doc;
        let mut edge_index = 0usize;
        for node in doc.descendants().filter(Node::is_element) {
            if tag_is(node, "g") && has_class(node, "node") {
                self.bind_node(node);
            } else if has_class(node, "edgeLabel")
                && !node.ancestors().skip(1).any(|a| has_class(a, "edgeLabel"))
            {
                self.bind_edge_label(node, edge_index);
                edge_index += 1;
            } else if has_class(node, "actor")
                || node.attribute("id").is_some_and(|id| id.starts_with("actor-"))
            {
                self.bind_actor(node);
            }
        }

        for node in doc.descendants().filter(|n| tag_is(*n, "line")) {
            self.bind_lifeline(node);
        }
    }

    fn bind_node(&mut self, node: Node<'_, '_>) {
        let Some(id) = element_id(node) else {
            return;
        };
        let label = first_descendant(node, |n| has_class(n, "nodeLabel"))
            .or_else(|| first_descendant(node, |n| tag_is(n, "span")))
            .or_else(|| first_descendant(node, |n| tag_is(n, "text")))
            .map(text_content)
            .filter(|t| !t.is_empty());
        let transform = self.placed(node, &id);
        let element = VisualElement {
            display_text: label.unwrap_or_else(|| id.to_string()),
            id,
            category: ElementCategory::Node,
            transform,
        };
        self.push(BindingKind::Node, node, element);
    }

    fn bind_edge_label(&mut self, node: Node<'_, '_>, index: usize) {
        let text = first_descendant(node, |n| tag_is(n, "span"))
            .or_else(|| first_descendant(node, |n| tag_is(n, "text")))
            .map(text_content)
            .unwrap_or_default();
        let element = VisualElement {
            id: ElementId::from_index(index),
            category: ElementCategory::Edge,
            display_text: text,
            transform: own_translate(node),
        };
        self.push(BindingKind::EdgeLabel, node, element);
    }

    fn bind_actor(&mut self, node: Node<'_, '_>) {
        let group = match node.parent_element() {
            Some(parent) if !tag_is(node, "g") && tag_is(parent, "g") => parent,
            _ => node,
        };
        if !self.seen_actor_groups.insert(group.id()) {
            return;
        }

        let text = first_descendant(group, |n| tag_is(n, "text"))
            .or_else(|| first_descendant(group, |n| tag_is(n, "tspan")))
            .map(text_content)
            .filter(|t| !t.is_empty());
        let Some(id) = actor_id(group, text.as_deref().unwrap_or_default()) else {
            return;
        };

        let center_x = match first_descendant(group, |n| tag_is(n, "rect")) {
            Some(rect) => {
                let left = number_attr(rect, "x") + accumulated_translate(rect).x;
                left + number_attr(rect, "width") / 2.0
            }
            None => accumulated_translate(group).x,
        };

        let transform = self.placed(group, &id);
        let element = VisualElement {
            display_text: text.unwrap_or_else(|| id.to_string()),
            id,
            category: ElementCategory::Actor,
            transform,
        };
        self.actors.push(ActorAnchor {
            element: element.clone(),
            center_x,
        });
        self.push(BindingKind::Actor, group, element);
    }

    fn bind_lifeline(&mut self, line: Node<'_, '_>) {
        let (x1, x2) = (number_attr(line, "x1"), number_attr(line, "x2"));
        let (y1, y2) = (number_attr(line, "y1"), number_attr(line, "y2"));
        if (y2 - y1).abs() <= (x2 - x1).abs() {
            return;
        }
        let x = (x1 + x2) / 2.0 + accumulated_translate(line).x;

        let closest = self
            .actors
            .iter()
            .map(|a| ((a.center_x - x).abs(), a))
            .filter(|(distance, _)| *distance < LIFELINE_TOLERANCE)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, anchor)| anchor.element.clone());
        if let Some(element) = closest {
            self.push(BindingKind::Lifeline, line, element);
        }
    }
}

fn apply_rewrites(
    markup: &str,
    rewrites: &HashMap<OrdinalKey, String>,
) -> Result<String, BindError> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    let out = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                let tag = el.tag_name().to_ascii_lowercase();
                let counter = counters.entry(tag.clone()).or_default();
                let key = (tag, *counter);
                *counter += 1;
                if let Some(transform) = rewrites.get(&key) {
                    el.set_attribute("transform", transform)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(out)
}

/// Binds a successful render against the overrides of the document it was rendered from.
pub fn bind(output: &RenderOutput, overrides: &PositionOverrides) -> Result<BoundView, BindError> {
    let doc = Document::parse(&output.svg)?;
    let mut classifier = Classifier::new(&doc, overrides);
    classifier.classify();

    let markup = if classifier.rewrites.is_empty() {
        output.svg.clone()
    } else {
        apply_rewrites(&output.svg, &classifier.rewrites)?
    };

    debug!(
        bindings = classifier.bindings.len(),
        moved = classifier.rewrites.len(),
        "bound rendered view"
    );
    Ok(BoundView {
        markup,
        size: output.size,
        bindings: classifier.bindings,
    })
}

#[cfg(test)]
mod tests;
