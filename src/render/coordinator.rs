// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{debug, warn};

use super::{RenderError, RenderOutput};
use crate::model::{SourceDocument, ThemeConfig};

/// Monotonically increasing id of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderToken(u64);

impl RenderToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Everything a renderer needs for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub token: RenderToken,
    pub document: SourceDocument,
    pub theme: ThemeConfig,
}

/// The last successfully rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub token: RenderToken,
    pub document: SourceDocument,
    pub output: RenderOutput,
}

#[derive(Debug)]
pub enum RenderOutcome {
    Applied,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
    /// The latest request failed; the previous view stays in place.
    Failed(RenderError),
}

/// Tracks in-flight renders and applies only the result of the latest request.
#[derive(Debug, Default)]
pub struct RenderCoordinator {
    issued: u64,
    latest: Option<RenderToken>,
    view: Option<RenderedView>,
    error: Option<&'static str>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new request for `document`, superseding every earlier one.
    ///
    /// A blank document clears the view instead and returns `None`.
    pub fn begin(&mut self, document: &SourceDocument, theme: &ThemeConfig) -> Option<RenderRequest> {
        self.issued += 1;
        let token = RenderToken(self.issued);

        if document.is_blank() {
            debug!(token = token.get(), "blank document, clearing view");
            self.latest = None;
            self.view = None;
            self.error = None;
            return None;
        }

        debug!(token = token.get(), "render requested");
        self.latest = Some(token);
        Some(RenderRequest {
            token,
            document: document.clone(),
            theme: theme.clone(),
        })
    }

    /// Applies the result of `request` if it is still the latest one.
    pub fn finish(
        &mut self,
        request: RenderRequest,
        result: Result<RenderOutput, RenderError>,
    ) -> RenderOutcome {
        if !self.is_latest(request.token) {
            debug!(
                token = request.token.get(),
                latest = self.latest.map(RenderToken::get),
                "discarding stale render"
            );
            return RenderOutcome::Stale;
        }
        self.latest = None;

        match result {
            Ok(output) => {
                debug!(
                    token = request.token.get(),
                    width = output.size.width,
                    height = output.size.height,
                    "render applied"
                );
                self.error = None;
                self.view = Some(RenderedView {
                    token: request.token,
                    document: request.document,
                    output,
                });
                RenderOutcome::Applied
            }
            Err(err) => {
                warn!(token = request.token.get(), error = %err, "render failed");
                self.error = Some(err.user_message());
                RenderOutcome::Failed(err)
            }
        }
    }

    /// Whether `token` belongs to the request whose result would still be applied.
    pub fn is_latest(&self, token: RenderToken) -> bool {
        self.latest == Some(token)
    }

    /// Whether a request was issued and has not resolved yet.
    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    pub fn view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    /// The fixed message for the last failure, cleared by the next successful render.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error
    }
}
