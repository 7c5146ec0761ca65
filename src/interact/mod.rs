// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer state machine for the rendered canvas.
//!
//! ```text
//! Idle --press--> PointerDown --move > threshold--> Panning | DraggingElement
//!                      |                                 |
//!                      +--release (no motion)--> click   +--release--> Idle
//! ```
//!
//! The controller owns every piece of transient UI state (pointer phase, viewport, selection,
//! pending drag preview). Release events are expected from a window-wide listener so a drag can
//! always finish, even when the pointer leaves the element it started on.

use tracing::debug;

use crate::model::{ElementId, Point, SelectedElement};
use crate::render::HitTarget;

mod frame;
mod viewport;

pub use frame::FrameCoalescer;
pub use viewport::{Viewport, MAX_SCALE, MIN_SCALE, ZOOM_STEP};

/// Pointer travel (per axis, in pixels) before a press becomes a pan or a drag.
pub const DRAG_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
enum PointerState {
    Idle,
    PointerDown {
        origin: Point,
        target: Option<HitTarget>,
    },
    Panning {
        last: Point,
    },
    DraggingElement {
        origin: Point,
        target: HitTarget,
    },
}

/// Observable phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Idle,
    PointerDown,
    Panning,
    DraggingElement,
}

/// Where a dragged element should be drawn on the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub id: ElementId,
    pub transform: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveEffect {
    None,
    /// The canvas moved by this many pixels.
    Panned(Point),
    /// A drag preview is pending; the host must request an animation frame.
    RequestFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    None,
    /// Press and release without motion on an element.
    Click(SelectedElement),
    /// Drag finished; `delta` is in source-space units, measured from press to release.
    Move { id: ElementId, delta: Point },
}

/// Immutable view of the controller state, handed to whatever draws the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSnapshot {
    pub phase: PointerPhase,
    pub viewport: Viewport,
    pub selection: Option<SelectedElement>,
}

#[derive(Debug)]
pub struct InteractionController {
    state: PointerState,
    viewport: Viewport,
    selection: Option<SelectedElement>,
    frames: FrameCoalescer<DragPreview>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            state: PointerState::Idle,
            viewport: Viewport::default(),
            selection: None,
            frames: FrameCoalescer::new(),
        }
    }
}

fn exceeds_threshold(origin: Point, position: Point) -> bool {
    let delta = position - origin;
    delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PointerPhase {
        match self.state {
            PointerState::Idle => PointerPhase::Idle,
            PointerState::PointerDown { .. } => PointerPhase::PointerDown,
            PointerState::Panning { .. } => PointerPhase::Panning,
            PointerState::DraggingElement { .. } => PointerPhase::DraggingElement,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> Option<&SelectedElement> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) -> Option<SelectedElement> {
        self.selection.take()
    }

    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            phase: self.phase(),
            viewport: self.viewport,
            selection: self.selection.clone(),
        }
    }

    /// Press on the canvas (`target == None`) or on a bound element.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        position: Point,
        target: Option<HitTarget>,
    ) {
        if button != PointerButton::Primary {
            return;
        }
        self.frames.cancel();
        self.state = PointerState::PointerDown {
            origin: position,
            target,
        };
    }

    pub fn pointer_move(&mut self, position: Point) -> MoveEffect {
        match &mut self.state {
            PointerState::Idle => MoveEffect::None,
            PointerState::PointerDown { origin, target } => {
                let origin = *origin;
                if !exceeds_threshold(origin, position) {
                    return MoveEffect::None;
                }
                match target.take() {
                    Some(target) if target.draggable => {
                        debug!(id = %target.id, "drag started");
                        self.state = PointerState::DraggingElement { origin, target };
                        self.preview(position)
                    }
                    _ => {
                        self.state = PointerState::Panning { last: position };
                        let delta = position - origin;
                        self.viewport.pan_by(delta);
                        MoveEffect::Panned(delta)
                    }
                }
            }
            PointerState::Panning { last } => {
                let delta = position - *last;
                *last = position;
                self.viewport.pan_by(delta);
                MoveEffect::Panned(delta)
            }
            PointerState::DraggingElement { .. } => self.preview(position),
        }
    }

    fn preview(&mut self, position: Point) -> MoveEffect {
        let PointerState::DraggingElement { origin, target } = &self.state else {
            return MoveEffect::None;
        };
        let offset = (position - *origin).scale_down(self.viewport.scale());
        let preview = DragPreview {
            id: target.id.clone(),
            transform: target.transform + offset,
        };
        if self.frames.push(preview) {
            MoveEffect::RequestFrame
        } else {
            MoveEffect::None
        }
    }

    /// The latest drag preview, consumed by the animation-frame callback.
    pub fn animation_frame(&mut self) -> Option<DragPreview> {
        self.frames.take()
    }

    /// Release, wherever the pointer is. Always returns to `Idle`.
    pub fn pointer_up(&mut self, position: Point) -> Release {
        self.frames.cancel();
        match std::mem::replace(&mut self.state, PointerState::Idle) {
            PointerState::DraggingElement { origin, target } => {
                let delta = (position - origin).scale_down(self.viewport.scale());
                debug!(id = %target.id, dx = delta.x, dy = delta.y, "drag finished");
                Release::Move {
                    id: target.id,
                    delta,
                }
            }
            PointerState::PointerDown {
                target: Some(target),
                ..
            } => {
                let selected = SelectedElement::new(target.id, target.category, target.text);
                self.selection = Some(selected.clone());
                Release::Click(selected)
            }
            PointerState::PointerDown { target: None, .. }
            | PointerState::Panning { .. }
            | PointerState::Idle => Release::None,
        }
    }
}
