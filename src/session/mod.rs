// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One editing session: a source buffer plus everything derived from it.
//!
//! The session is driven from a single control thread. The two asynchronous boundaries
//! (rendering and generation) are split into `begin_*`/`finish_*` pairs so a caller can await
//! the collaborator elsewhere; the `*_with` helpers do both halves inline.

use std::path::Path;

use tracing::{debug, info};

use crate::format::{OverrideCache, PositionOverrides};
use crate::generate::{
    GenerationError, GenerationGate, GenerationRequest, GenerationTicket, Generator,
};
use crate::interact::{
    DragPreview, InteractionController, InteractionSnapshot, MoveEffect, PointerButton, Release,
};
use crate::model::{
    DiagramType, HistoryLog, Point, SelectedElement, SourceBuffer, SourceDocument, ThemeConfig,
};
use crate::ops::{self, Edit, EditStatus, MutationError};
use crate::render::{
    bind, BoundView, HitTarget, RenderCoordinator, RenderError, RenderOutcome,
    RenderOutput, RenderRequest, Renderer,
};
use crate::store::{self, StoreError, WriteDurability};
use crate::tools::{self, ToolItem};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no element is selected")]
    NoSelection,
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct Session {
    buffer: SourceBuffer,
    kind: DiagramType,
    theme: ThemeConfig,
    overrides: OverrideCache,
    controller: InteractionController,
    renders: RenderCoordinator,
    generation: GenerationGate,
    view: Option<BoundView>,
}

impl Session {
    pub fn new(kind: DiagramType, initial: impl Into<SourceDocument>) -> Self {
        Self {
            buffer: SourceBuffer::new(initial),
            kind,
            theme: ThemeConfig::default(),
            overrides: OverrideCache::default(),
            controller: InteractionController::new(),
            renders: RenderCoordinator::new(),
            generation: GenerationGate::new(),
            view: None,
        }
    }

    /// A session seeded with the starter template of `kind` (empty for types without one).
    pub fn from_template(kind: DiagramType) -> Self {
        Self::new(kind, tools::template_for(kind).unwrap_or_default())
    }

    pub fn source(&self) -> &SourceDocument {
        self.buffer.current()
    }

    pub fn kind(&self) -> DiagramType {
        self.kind
    }

    pub fn set_kind(&mut self, kind: DiagramType) {
        self.kind = kind;
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Replaces the theme. Takes effect with the next render.
    pub fn set_theme(&mut self, theme: ThemeConfig) {
        self.theme = theme;
    }

    pub fn history(&self) -> &HistoryLog {
        self.buffer.history()
    }

    /// Position overrides stored in the active document.
    pub fn overrides(&mut self) -> &PositionOverrides {
        self.overrides.get(self.buffer.current())
    }

    /// Free-text keystrokes. Visible immediately, recorded by [`Session::apply_text`].
    pub fn edit_text(&mut self, text: impl Into<SourceDocument>) {
        self.buffer.edit_text(text);
    }

    pub fn apply_text(&mut self) -> bool {
        self.buffer.apply_draft()
    }

    pub fn commit(&mut self, doc: impl Into<SourceDocument>) -> bool {
        self.buffer.commit(doc)
    }

    pub fn undo(&mut self) -> bool {
        self.buffer.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.buffer.redo()
    }

    /// Switches the diagram type and commits its template. Returns whether a template existed.
    pub fn load_template(&mut self, kind: DiagramType) -> bool {
        self.kind = kind;
        self.controller.clear_selection();
        match tools::template_for(kind) {
            Some(template) => {
                info!(kind = %kind, "template loaded");
                self.commit(template);
                true
            }
            None => false,
        }
    }

    pub fn insert_tool(&mut self, tool: &ToolItem) -> bool {
        let text = ops::insert_snippet(self.source(), tool.snippet);
        self.commit(text)
    }

    /// Toggles the layout direction; commits only when the header changed.
    pub fn rotate(&mut self) -> bool {
        match ops::rotate_direction(self.source()) {
            Some(text) => self.commit(text),
            None => {
                debug!(kind = %self.kind, "nothing to rotate");
                false
            }
        }
    }

    /// Starts a render of the active document, superseding any render in flight.
    pub fn begin_render(&mut self) -> Option<RenderRequest> {
        let request = self.renders.begin(self.buffer.current(), &self.theme);
        if request.is_none() {
            self.view = None;
        }
        request
    }

    /// Binds a render result against the overrides of the rendered document, then applies it.
    /// Stale and failed renders leave the bound view untouched; a tree that cannot be bound
    /// counts as a failed render.
    pub fn finish_render(
        &mut self,
        request: RenderRequest,
        result: Result<RenderOutput, RenderError>,
    ) -> RenderOutcome {
        let mut bound = None;
        let result = match result {
            Ok(output) if self.renders.is_latest(request.token) => {
                let overrides = self.overrides.get(&request.document);
                match bind(&output, overrides) {
                    Ok(view) => {
                        bound = Some(view);
                        Ok(output)
                    }
                    Err(err) => Err(RenderError::from(err)),
                }
            }
            other => other,
        };

        let outcome = self.renders.finish(request, result);
        if matches!(outcome, RenderOutcome::Applied) {
            self.view = bound;
        }
        outcome
    }

    pub async fn render_with<R: Renderer>(&mut self, renderer: &R) -> Option<RenderOutcome> {
        let request = self.begin_render()?;
        let result = renderer.render(&request.document, &request.theme).await;
        Some(self.finish_render(request, result))
    }

    pub fn view(&self) -> Option<&BoundView> {
        self.view.as_ref()
    }

    /// Fixed message for the last failed render, if it has not been superseded by a success.
    pub fn render_error(&self) -> Option<&'static str> {
        self.renders.error_message()
    }

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        position: Point,
        target: Option<HitTarget>,
    ) {
        self.controller.pointer_down(button, position, target);
    }

    pub fn pointer_move(&mut self, position: Point) -> MoveEffect {
        self.controller.pointer_move(position)
    }

    pub fn animation_frame(&mut self) -> Option<DragPreview> {
        self.controller.animation_frame()
    }

    /// Finishes a gesture. A drag commits the element's accumulated offset as one history step.
    pub fn pointer_up(&mut self, position: Point) -> Result<Release, SessionError> {
        let release = self.controller.pointer_up(position);
        if let Release::Move { id, delta } = &release {
            let prior = self
                .overrides
                .get(self.buffer.current())
                .offset_or_zero(id.as_str());
            let result = ops::move_element(self.buffer.current(), id.as_str(), prior + *delta)?;
            if result.is_changed() {
                self.commit(result.text);
            }
        }
        Ok(release)
    }

    pub fn selection(&self) -> Option<&SelectedElement> {
        self.controller.selection()
    }

    pub fn close_selection(&mut self) {
        self.controller.clear_selection();
    }

    /// Applies `edit` to the selected element and closes the selection.
    ///
    /// A failed edit keeps both the selection and the history as they were.
    pub fn save_selection(&mut self, edit: &Edit) -> Result<EditStatus, SessionError> {
        let Some(target) = self.controller.selection() else {
            return Err(SessionError::NoSelection);
        };
        let result = ops::apply_edit(self.buffer.current(), self.kind, target, edit)?;
        let status = result.status;
        if result.is_changed() {
            self.commit(result.text);
        }
        self.controller.clear_selection();
        Ok(status)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.controller.viewport_mut().zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.controller.viewport_mut().zoom_out()
    }

    pub fn fit(&mut self) {
        self.controller.viewport_mut().fit();
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        self.controller.snapshot()
    }

    pub fn export_source(
        &self,
        path: &Path,
        durability: WriteDurability,
    ) -> Result<(), SessionError> {
        store::export_source(path, self.source(), durability)?;
        Ok(())
    }

    /// Writes the last bound markup, including override transforms.
    pub fn export_svg(&self, path: &Path, durability: WriteDurability) -> Result<(), SessionError> {
        let markup = self.view.as_ref().map_or("", |view| view.markup.as_str());
        store::export_svg(path, markup, durability)?;
        Ok(())
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_busy()
    }

    /// Claims the generation gate and builds the request around the active source.
    pub fn begin_generation(
        &mut self,
        instruction: &str,
    ) -> Result<(GenerationTicket, GenerationRequest), SessionError> {
        let ticket = self.generation.begin()?;
        let request = GenerationRequest::new(instruction, Some(self.source().as_str()));
        Ok((ticket, request))
    }

    pub fn cancel_generation(&mut self) {
        self.generation.cancel();
    }

    /// Commits a generated source. `Ok(false)` means the response was stale or unchanged.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        response: Result<String, GenerationError>,
    ) -> Result<bool, SessionError> {
        match self.generation.finish(ticket, response)? {
            Some(code) => Ok(self.commit(code)),
            None => Ok(false),
        }
    }

    pub async fn generate_with<G: Generator>(
        &mut self,
        generator: &G,
        instruction: &str,
    ) -> Result<bool, SessionError> {
        let (ticket, request) = self.begin_generation(instruction)?;
        let response = generator.generate(&request).await;
        self.finish_generation(ticket, response)
    }
}

#[cfg(test)]
mod tests;
