// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{bind, normalize_dom_id, parse_translate, with_translate, BindingKind};
use crate::format::parse_positions;
use crate::model::{ElementCategory, Point};
use crate::render::{RenderOutput, SvgSize};

const FLOWCHART_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" id="my-svg" viewBox="0 0 200 300">
<g class="root">
<g class="edgePaths"><path class="flowchart-link" id="L-A-LINE-ITEM-0" d="M0,0L1,1"/></g>
<g class="edgeLabels">
<g class="edgeLabel" transform="translate(50, 80)"><g class="label"><foreignObject width="20" height="20"><div xmlns="http://www.w3.org/1999/xhtml"><span class="edgeLabel">ok</span></div></foreignObject></g></g>
<g class="edgeLabel"><g class="label"><foreignObject width="0" height="0"><div xmlns="http://www.w3.org/1999/xhtml"><span class="edgeLabel"></span></div></foreignObject></g></g>
</g>
<g class="nodes">
<g class="node default" id="flowchart-A-0" transform="translate(100, 40)"><rect width="80" height="40"/><g class="label"><foreignObject width="40" height="20"><div xmlns="http://www.w3.org/1999/xhtml"><span class="nodeLabel">Start</span></div></foreignObject></g></g>
<g class="node default" id="flowchart-LINE-ITEM-1" transform="translate(100, 140)"><rect width="80" height="40"/><g class="label"><foreignObject width="40" height="20"><div xmlns="http://www.w3.org/1999/xhtml"><span class="nodeLabel"></span></div></foreignObject></g></g>
</g>
</g>
</svg>"#;

const SEQUENCE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-50 -10 450 300">
<g><line id="actor0" x1="75" y1="65" x2="75" y2="250" class="actor-line" name="Alice"/></g>
<g><line id="actor1" x1="275" y1="65" x2="275" y2="250" class="actor-line" name="Bob"/></g>
<g><rect x="0" y="0" width="150" height="65" name="Alice" class="actor actor-top"/><text x="75" y="32.5" class="actor actor-box"><tspan>Alice A.</tspan></text></g>
<g><rect x="200" y="0" width="150" height="65" name="Bob" class="actor actor-top"/><text x="275" y="32.5" class="actor actor-box"><tspan>Bob</tspan></text></g>
<line x1="75" y1="100" x2="275" y2="100" class="messageLine0"/>
</svg>"#;

#[fixture]
fn flowchart() -> RenderOutput {
    RenderOutput::from_svg(FLOWCHART_SVG.to_owned()).expect("flowchart svg")
}

#[fixture]
fn sequence() -> RenderOutput {
    RenderOutput::from_svg(SEQUENCE_SVG.to_owned()).expect("sequence svg")
}

#[rstest]
#[case("flowchart-A-0", "A")]
#[case("my-svg-flowchart-LINE-ITEM-12", "LINE-ITEM")]
#[case("state-Idle-3", "Idle")]
#[case("classId-User-0", "User")]
#[case("node-B", "B")]
#[case("plain", "plain")]
fn dom_ids_normalize_to_source_ids(#[case] dom_id: &str, #[case] expected: &str) {
    assert_eq!(normalize_dom_id(dom_id), expected);
}

#[rstest]
#[case("translate(10, 20)", Some(Point::new(10.0, 20.0)))]
#[case("translate(10,20) scale(2)", Some(Point::new(10.0, 20.0)))]
#[case("translate(-4.5)", Some(Point::new(-4.5, 0.0)))]
#[case("scale(2)", None)]
fn translate_parsing(#[case] transform: &str, #[case] expected: Option<Point>) {
    assert_eq!(parse_translate(transform), expected);
}

#[test]
fn translate_rewrite_keeps_other_functions() {
    assert_eq!(
        with_translate(Some("translate(1, 2) scale(2)"), Point::new(3.0, 4.5)),
        "translate(3, 4.5) scale(2)"
    );
    assert_eq!(with_translate(Some("scale(2)"), Point::new(1.0, 1.0)), "translate(1, 1) scale(2)");
    assert_eq!(with_translate(None, Point::new(1.0, 1.0)), "translate(1, 1)");
}

#[rstest]
fn flowchart_nodes_and_edge_labels_are_classified(flowchart: RenderOutput) {
    let view = bind(&flowchart, &parse_positions("")).expect("bind");

    let kinds = view.bindings.iter().map(|b| b.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            BindingKind::EdgeLabel,
            BindingKind::EdgeLabel,
            BindingKind::Node,
            BindingKind::Node
        ]
    );

    let start = view.find(BindingKind::Node, "A").expect("node A");
    assert_eq!(start.element.display_text, "Start");
    assert_eq!(start.element.category, ElementCategory::Node);
    assert_eq!(start.element.transform, Point::new(100.0, 40.0));
    assert!(start.draggable);

    let unlabeled = view.find(BindingKind::Node, "LINE-ITEM").expect("node");
    assert_eq!(unlabeled.element.display_text, "LINE-ITEM");

    let ok = view.edge(0).expect("edge 0");
    assert_eq!(ok.element.id.as_index(), Some(0));
    assert_eq!(ok.element.display_text, "ok");
    assert!(!ok.draggable);
    assert_eq!(view.edge(1).expect("edge 1").element.display_text, "");

    assert_eq!(view.markup, FLOWCHART_SVG);
    assert_eq!(view.size, SvgSize { width: 200.0, height: 300.0 });
}

#[rstest]
fn overrides_are_added_to_the_rendered_translation(flowchart: RenderOutput) {
    let overrides = parse_positions("graph TD\n%% position: A 10.0 -5.0");
    let view = bind(&flowchart, &overrides).expect("bind");

    let start = view.find(BindingKind::Node, "A").expect("node A");
    assert_eq!(start.element.transform, Point::new(110.0, 35.0));
    assert_eq!(start.hit_target().transform, Point::new(110.0, 35.0));

    assert!(view.markup.contains(r#"id="flowchart-A-0" transform="translate(110, 35)""#));
    assert!(view
        .markup
        .contains(r#"id="flowchart-LINE-ITEM-1" transform="translate(100, 140)""#));
    assert!(view.markup.contains(r#"<g class="edgeLabel" transform="translate(50, 80)">"#));
}

#[rstest]
fn sequence_actors_and_lifelines(sequence: RenderOutput) {
    let view = bind(&sequence, &parse_positions("")).expect("bind");

    let actors = view
        .bindings
        .iter()
        .filter(|b| b.kind == BindingKind::Actor)
        .map(|b| (b.element.id.as_str(), b.element.display_text.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(actors, vec![("Alice", "Alice A."), ("Bob", "Bob")]);

    let lifelines = view
        .bindings
        .iter()
        .filter(|b| b.kind == BindingKind::Lifeline)
        .collect::<Vec<_>>();
    assert_eq!(lifelines.len(), 2);
    assert_eq!(lifelines[0].element.id.as_str(), "Alice");
    assert_eq!(lifelines[0].dom_id.as_deref(), Some("actor0"));
    assert_eq!(lifelines[0].element.category, ElementCategory::Actor);
    assert!(!lifelines[0].draggable);
    assert_eq!(lifelines[1].element.id.as_str(), "Bob");

    assert_eq!(view.elements().count(), 2);
}

#[rstest]
fn actor_overrides_move_the_actor_group(sequence: RenderOutput) {
    let view = bind(&sequence, &parse_positions("%% position: Bob 20 0")).expect("bind");
    let bob = view.find(BindingKind::Actor, "Bob").expect("Bob");
    assert_eq!(bob.element.transform, Point::new(20.0, 0.0));
    assert!(view
        .markup
        .contains(r#"<g transform="translate(20, 0)"><rect x="200""#));

    // Lifelines still resolve against the rendered baseline.
    let lifeline = view
        .bindings
        .iter()
        .find(|b| b.kind == BindingKind::Lifeline && b.element.id.as_str() == "Bob")
        .expect("Bob lifeline");
    assert_eq!(lifeline.dom_id.as_deref(), Some("actor1"));
}

#[test]
fn malformed_markup_fails_to_bind() {
    let output = RenderOutput {
        svg: "<svg><g></svg>".to_owned(),
        size: SvgSize::default(),
    };
    assert!(bind(&output, &parse_positions("")).is_err());
}
