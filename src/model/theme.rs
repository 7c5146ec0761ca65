// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer theme configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Edge curve interpolation understood by the renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveStyle {
    #[default]
    Basis,
    Linear,
    Cardinal,
    Step,
}

impl CurveStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basis => "basis",
            Self::Linear => "linear",
            Self::Cardinal => "cardinal",
            Self::Step => "step",
        }
    }
}

/// User-editable colors and curve style, passed to the renderer on every render.
///
/// Colors are opaque strings forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub line_color: String,
    pub text_color: String,
    pub curve_style: CurveStyle,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#e0e7ff".to_owned(),
            secondary_color: "#f3f4f6".to_owned(),
            line_color: "#6366f1".to_owned(),
            text_color: "#1e1b4b".to_owned(),
            curve_style: CurveStyle::Basis,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read theme config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid theme config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ThemeConfig {
    /// Loads a theme from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Initialization options for the Mermaid engine.
    pub fn to_renderer_config(&self) -> Value {
        json!({
            "startOnLoad": false,
            "theme": "base",
            "securityLevel": "loose",
            "themeVariables": {
                "primaryColor": self.primary_color,
                "primaryTextColor": self.text_color,
                "primaryBorderColor": self.secondary_color,
                "lineColor": self.line_color,
                "secondaryColor": self.secondary_color,
                "tertiaryColor": "#ffffff",
            },
            "flowchart": { "curve": self.curve_style.as_str(), "htmlLabels": true },
            "sequence": { "actorMargin": 50 },
            "fontFamily": "Inter, sans-serif",
        })
    }
}
