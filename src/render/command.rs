// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use super::{RenderError, RenderOutput, Renderer};
use crate::model::ThemeConfig;

const INPUT_FILE: &str = "diagram.mmd";
const OUTPUT_FILE: &str = "diagram.svg";
const CONFIG_FILE: &str = "mermaid-config.json";

/// Renders through the Mermaid CLI (`mmdc`).
///
/// Each call works in its own temporary directory, so concurrent renders never share files.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    extra_args: Vec<String>,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new("mmdc")
    }
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Extra arguments appended after the generated ones (e.g. `--puppeteerConfigFile`).
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn engine_error(&self, source: io::Error) -> RenderError {
        RenderError::Engine {
            program: self.program.clone(),
            source,
        }
    }

    async fn run(&self, dir: &Path, source: &str, theme: &ThemeConfig) -> Result<String, RenderError> {
        let input = dir.join(INPUT_FILE);
        let output = dir.join(OUTPUT_FILE);
        let config = dir.join(CONFIG_FILE);

        tokio::fs::write(&input, source)
            .await
            .map_err(|err| self.engine_error(err))?;
        let config_json = serde_json::to_vec(&theme.to_renderer_config())
            .map_err(|err| self.engine_error(io::Error::other(err)))?;
        tokio::fs::write(&config, config_json)
            .await
            .map_err(|err| self.engine_error(err))?;

        debug!(program = %self.program, "spawning renderer");
        let result = Command::new(&self.program)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-c")
            .arg(&config)
            .arg("-q")
            .args(&self.extra_args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| self.engine_error(err))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::Syntax {
                detail: stderr.trim().to_owned(),
            });
        }

        tokio::fs::read_to_string(&output)
            .await
            .map_err(|err| self.engine_error(err))
    }
}

impl Renderer for CommandRenderer {
    async fn render(&self, source: &str, theme: &ThemeConfig) -> Result<RenderOutput, RenderError> {
        let dir = tempfile::Builder::new()
            .prefix("mermaid-sync-render")
            .tempdir()
            .map_err(|err| self.engine_error(err))?;
        let svg = self.run(dir.path(), source, theme).await?;
        RenderOutput::from_svg(svg)
    }
}
