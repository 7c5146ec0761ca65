// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering of diagram sources to SVG and binding of the rendered tree.
//!
//! The renderer itself is an external collaborator behind the [`Renderer`] trait. Everything
//! around it (request tokens, stale-result rejection, post-render binding) lives here.

use std::future::Future;
use std::io;

use crate::model::ThemeConfig;

pub mod bind;
mod command;
mod coordinator;

pub use bind::{bind, BindError, Binding, BindingKind, BoundView, HitTarget};
pub use command::CommandRenderer;
pub use coordinator::{RenderCoordinator, RenderOutcome, RenderRequest, RenderToken, RenderedView};

/// User-facing text for any syntax failure. Engine detail is only logged.
pub const SYNTAX_ERROR_MESSAGE: &str = "Diagram syntax error. Please check the source.";

const ENGINE_ERROR_MESSAGE: &str = "The diagram renderer is unavailable.";

/// Pixel dimensions of a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SvgSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub svg: String,
    pub size: SvgSize,
}

impl RenderOutput {
    /// Wraps renderer markup, reading its size from the root element.
    pub fn from_svg(svg: String) -> Result<Self, RenderError> {
        let size = svg_size(&svg)?;
        Ok(Self { svg, size })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("diagram source did not render: {detail}")]
    Syntax { detail: String },
    #[error("failed to run renderer `{program}`")]
    Engine {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("renderer produced malformed SVG")]
    InvalidOutput(#[from] roxmltree::Error),
    #[error("rendered SVG could not be bound")]
    Bind(#[from] BindError),
}

impl RenderError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Syntax { .. } | Self::InvalidOutput(_) | Self::Bind(_) => SYNTAX_ERROR_MESSAGE,
            Self::Engine { .. } => ENGINE_ERROR_MESSAGE,
        }
    }
}

/// Turns diagram source into SVG markup.
///
/// Implementations must be idempotent for a given `(source, theme)` pair up to renderer-internal
/// identifiers.
pub trait Renderer {
    fn render(
        &self,
        source: &str,
        theme: &ThemeConfig,
    ) -> impl Future<Output = Result<RenderOutput, RenderError>> + Send;
}

/// Reads the diagram size from `viewBox`, falling back to `width`/`height` attributes.
pub fn svg_size(svg: &str) -> Result<SvgSize, RenderError> {
    let doc = roxmltree::Document::parse(svg)?;
    let root = doc.root_element();

    if let Some(view_box) = root.attribute("viewBox") {
        let parts = view_box
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .filter_map(|t| t.parse::<f64>().ok())
            .collect::<Vec<_>>();
        if let [_, _, width, height] = parts[..] {
            return Ok(SvgSize { width, height });
        }
    }

    let dimension = |name: &str| {
        root.attribute(name)
            .map(|v| v.trim().trim_end_matches("px"))
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    Ok(SvgSize {
        width: dimension("width"),
        height: dimension("height"),
    })
}
