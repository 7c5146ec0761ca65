// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{Session, SessionError};
use crate::generate::{GenerationError, GenerationRequest, Generator};
use crate::interact::{PointerButton, Release};
use crate::model::{DiagramType, Point, ThemeConfig};
use crate::ops::{Edit, EditStatus, ElementPatch, MutationError};
use crate::render::{
    BindingKind, RenderError, RenderOutcome, RenderOutput, Renderer, SvgSize,
    SYNTAX_ERROR_MESSAGE,
};
use crate::store::{StoreError, WriteDurability};
use crate::tools::tools_for;

const TWO_NODES_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 300">
<g class="nodes">
<g class="node default" id="flowchart-A-0" transform="translate(100, 40)"><rect width="80" height="40"/><g class="label"><foreignObject width="40" height="20"><div xmlns="http://www.w3.org/1999/xhtml"><span class="nodeLabel">A</span></div></foreignObject></g></g>
<g class="node default" id="flowchart-B-1" transform="translate(100, 140)"><rect width="80" height="40"/><g class="label"><foreignObject width="40" height="20"><div xmlns="http://www.w3.org/1999/xhtml"><span class="nodeLabel">B</span></div></foreignObject></g></g>
</g>
</svg>"#;

struct StaticRenderer(&'static str);

impl Renderer for StaticRenderer {
    async fn render(&self, _source: &str, _theme: &ThemeConfig) -> Result<RenderOutput, RenderError> {
        RenderOutput::from_svg(self.0.to_owned())
    }
}

struct BrokenRenderer;

impl Renderer for BrokenRenderer {
    async fn render(&self, _source: &str, _theme: &ThemeConfig) -> Result<RenderOutput, RenderError> {
        Err(RenderError::Syntax {
            detail: "Parse error on line 2".to_owned(),
        })
    }
}

struct ScriptedGenerator(Result<String, GenerationError>);

impl Generator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        self.0.clone()
    }
}

fn output() -> RenderOutput {
    RenderOutput::from_svg(TWO_NODES_SVG.to_owned()).expect("svg")
}

#[fixture]
fn session() -> Session {
    Session::new(DiagramType::Flowchart, "graph TD\n A-->B")
}

fn drag(session: &mut Session, id: &str, to: Point) -> Release {
    let target = session
        .view()
        .and_then(|view| view.find(BindingKind::Node, id))
        .map(|binding| binding.hit_target())
        .expect("bound node");
    session.pointer_down(PointerButton::Primary, Point::ZERO, Some(target));
    session.pointer_move(to);
    session.pointer_up(to).expect("release")
}

fn click(session: &mut Session, id: &str) {
    let target = session
        .view()
        .and_then(|view| view.find(BindingKind::Node, id))
        .map(|binding| binding.hit_target())
        .expect("bound node");
    session.pointer_down(PointerButton::Primary, Point::ZERO, Some(target));
    session.pointer_up(Point::ZERO).expect("release");
}

#[rstest]
#[tokio::test]
async fn drag_commits_annotation_and_rebinds(mut session: Session) {
    let renderer = StaticRenderer(TWO_NODES_SVG);
    session.render_with(&renderer).await.expect("render");

    let release = drag(&mut session, "A", Point::new(10.0, -5.0));
    assert!(matches!(release, Release::Move { .. }));
    assert_eq!(session.source().as_str(), "graph TD\n A-->B\n%% position: A 10.0 -5.0");
    assert_eq!(session.history().len(), 2);

    session.render_with(&renderer).await.expect("render");
    let view = session.view().expect("view");
    assert!(view.markup.contains("translate(110, 35)"));
    assert!(view.markup.contains("translate(100, 140)"));

    // The second drag starts from the stored offset, not from zero.
    drag(&mut session, "A", Point::new(5.0, 5.0));
    assert_eq!(session.source().as_str(), "graph TD\n A-->B\n%% position: A 15.0 0.0");

    assert!(session.undo());
    assert_eq!(session.source().as_str(), "graph TD\n A-->B\n%% position: A 10.0 -5.0");
}

#[rstest]
fn stale_render_does_not_replace_newer_view(mut session: Session) {
    let first = session.begin_render().expect("first request");
    session.commit("graph TD\n A-->B\n B-->C");
    let second = session.begin_render().expect("second request");

    let outcome = session.finish_render(second, Ok(output()));
    assert!(matches!(outcome, RenderOutcome::Applied));

    let outcome = session.finish_render(first, Ok(output()));
    assert!(matches!(outcome, RenderOutcome::Stale));
    assert!(session.view().is_some());
}

#[rstest]
#[tokio::test]
async fn failed_render_keeps_previous_view(mut session: Session) {
    session.render_with(&StaticRenderer(TWO_NODES_SVG)).await.expect("render");
    let markup = session.view().expect("view").markup.clone();

    session.edit_text("graph TD\n A-->");
    let outcome = session.render_with(&BrokenRenderer).await;
    assert!(matches!(outcome, Some(RenderOutcome::Failed(RenderError::Syntax { .. }))));
    assert_eq!(session.render_error(), Some(SYNTAX_ERROR_MESSAGE));
    assert_eq!(session.view().expect("view").markup, markup);
    assert_eq!(session.source().as_str(), "graph TD\n A-->");
}

#[rstest]
#[tokio::test]
async fn unbindable_tree_counts_as_failed_render(mut session: Session) {
    session.render_with(&StaticRenderer(TWO_NODES_SVG)).await.expect("render");
    let markup = session.view().expect("view").markup.clone();

    session.commit("graph TD\n A-->B\n B-->C");
    let request = session.begin_render().expect("request");
    let truncated = RenderOutput {
        svg: "<svg><g class=\"nodes\">".to_owned(),
        size: SvgSize::default(),
    };
    let outcome = session.finish_render(request, Ok(truncated));

    assert!(matches!(outcome, RenderOutcome::Failed(RenderError::Bind(_))));
    assert_eq!(session.render_error(), Some(SYNTAX_ERROR_MESSAGE));
    assert_eq!(session.view().expect("view").markup, markup);
}

#[rstest]
#[tokio::test]
async fn blank_source_clears_the_view(mut session: Session) {
    session.render_with(&StaticRenderer(TWO_NODES_SVG)).await.expect("render");
    session.edit_text("   ");
    let outcome = session.render_with(&StaticRenderer(TWO_NODES_SVG)).await;
    assert!(outcome.is_none());
    assert!(session.view().is_none());
}

#[rstest]
#[tokio::test]
async fn rename_through_selection_commits_once(mut session: Session) {
    session.commit("graph TD\n A[Start]-->B");
    session.render_with(&StaticRenderer(TWO_NODES_SVG)).await.expect("render");
    click(&mut session, "A");
    assert!(session.selection().is_some());

    let edit = Edit::Element(ElementPatch {
        label: Some("Begin".to_owned()),
        ..ElementPatch::default()
    });
    assert_eq!(session.save_selection(&edit).expect("save"), EditStatus::Changed);
    assert_eq!(session.source().as_str(), "graph TD\n A[Begin]-->B");
    assert!(session.selection().is_none());
    assert_eq!(session.history().len(), 3);
}

#[rstest]
fn save_without_selection_is_rejected(mut session: Session) {
    assert!(matches!(
        session.save_selection(&Edit::Delete),
        Err(SessionError::NoSelection)
    ));
}

#[tokio::test]
async fn ambiguous_edge_delete_leaves_history_untouched() {
    const EDGE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><g class="edgeLabel"><g class="label"><foreignObject width="0" height="0"><div xmlns="http://www.w3.org/1999/xhtml"><span class="edgeLabel"></span></div></foreignObject></g></g></svg>"#;
    let mut session = Session::new(DiagramType::Flowchart, "graph TD\n A-->B");
    session.render_with(&StaticRenderer(EDGE_SVG)).await.expect("render");

    let target = session.view().and_then(|v| v.edge(0)).map(|b| b.hit_target()).expect("edge");
    session.pointer_down(PointerButton::Primary, Point::ZERO, Some(target));
    session.pointer_up(Point::ZERO).expect("release");

    let err = session.save_selection(&Edit::Delete).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Mutation(MutationError::AmbiguousDeletion { .. })
    ));
    assert_eq!(session.history().len(), 1);
    assert!(session.selection().is_some());
}

#[rstest]
#[tokio::test]
async fn generation_commits_unfenced_source(mut session: Session) {
    let generator = ScriptedGenerator(Ok("```mermaid\ngraph LR\n X-->Y\n```".to_owned()));
    assert!(session.generate_with(&generator, "make it horizontal").await.expect("generate"));
    assert_eq!(session.source().as_str(), "graph LR\n X-->Y");
    assert!(!session.is_generating());

    assert!(session.undo());
    assert_eq!(session.source().as_str(), "graph TD\n A-->B");
}

#[rstest]
#[tokio::test]
async fn failed_generation_keeps_document(mut session: Session) {
    let generator = ScriptedGenerator(Err(GenerationError::Service {
        message: "unauthorized".to_owned(),
    }));
    let err = session.generate_with(&generator, "anything").await.unwrap_err();
    assert!(matches!(err, SessionError::Generation(GenerationError::Service { .. })));
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_generating());
}

#[rstest]
fn second_generation_is_busy_and_cancelled_response_is_dropped(mut session: Session) {
    let (ticket, request) = session.begin_generation("add C").expect("begin");
    assert!(request.prompt.starts_with("Original Code:\ngraph TD\n A-->B"));
    assert!(matches!(
        session.begin_generation("again"),
        Err(SessionError::Generation(GenerationError::Busy))
    ));

    session.cancel_generation();
    assert!(!session.finish_generation(ticket, Ok("graph LR".to_owned())).expect("finish"));
    assert_eq!(session.source().as_str(), "graph TD\n A-->B");
}

#[rstest]
fn templates_tools_and_rotation_are_undoable(mut session: Session) {
    assert!(session.load_template(DiagramType::Sequence));
    assert_eq!(session.kind(), DiagramType::Sequence);
    assert!(session.source().starts_with("sequenceDiagram"));

    let participant = &tools_for(DiagramType::Sequence)[1];
    assert!(session.insert_tool(participant));
    assert!(session.source().ends_with("participant NewPart as \"Component\""));

    assert!(!session.rotate());
    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.source().as_str(), "graph TD\n A-->B");

    assert!(!session.load_template(DiagramType::Pie));
    assert_eq!(session.kind(), DiagramType::Pie);
}

#[rstest]
fn rotate_commits_header_change(mut session: Session) {
    assert!(session.rotate());
    assert_eq!(session.source().as_str(), "graph LR\n A-->B");
    assert!(session.rotate());
    assert_eq!(session.source().as_str(), "graph TD\n A-->B");
    assert_eq!(session.history().len(), 3);
}

#[rstest]
fn zoom_is_clamped_and_fit_resets(mut session: Session) {
    for _ in 0..40 {
        session.zoom_out();
    }
    assert_eq!(session.snapshot().viewport.scale(), 0.2);
    assert_eq!(session.zoom_in(), 0.3);
    session.fit();
    assert_eq!(session.snapshot().viewport.scale(), 1.0);
    assert_eq!(session.snapshot().viewport.pan(), Point::ZERO);
}

#[rstest]
#[tokio::test]
async fn exports_source_and_bound_svg(mut session: Session) {
    let dir = tempfile::tempdir().expect("tempdir");
    let svg_path = dir.path().join("diagram.svg");

    assert!(matches!(
        session.export_svg(&svg_path, WriteDurability::BestEffort),
        Err(SessionError::Store(StoreError::NothingRendered))
    ));

    session.commit("graph TD\n A-->B\n%% position: A 0.0 10.0");
    session.render_with(&StaticRenderer(TWO_NODES_SVG)).await.expect("render");
    session.export_svg(&svg_path, WriteDurability::BestEffort).expect("svg");
    let written = std::fs::read_to_string(&svg_path).expect("read");
    assert!(written.contains("translate(100, 50)"));

    let source_path = dir.path().join("diagram.mmd");
    session.export_source(&source_path, WriteDurability::Durable).expect("source");
    assert_eq!(
        std::fs::read_to_string(&source_path).expect("read"),
        "graph TD\n A-->B\n%% position: A 0.0 10.0"
    );
}
