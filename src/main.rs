// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! mermaid-sync CLI entrypoint.
//!
//! Headless one-shot: load a Mermaid source, render it through the Mermaid CLI, apply the
//! stored `%% position:` annotations to the rendered tree and write the result as SVG.

use std::error::Error;
use std::path::PathBuf;

use mermaid_sync::logging::init_logging;
use mermaid_sync::model::{DiagramType, ThemeConfig};
use mermaid_sync::render::{CommandRenderer, RenderOutcome};
use mermaid_sync::session::Session;
use mermaid_sync::store::{ExportFormat, WriteDurability};
use tracing::{info, warn};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <file.mmd> [--type <kind>] [--theme <theme.json>] [--svg <out.svg>]\n      [--source-out <out.mmd>] [--mmdc <command>] [--durable-writes]\n      [--log-level <level>] [--log-format compact|pretty|json]\n\nThe diagram type is inferred from the first line unless --type is given.\n--svg defaults to `{svg}` in the current directory.\n--source-out additionally writes the loaded source back out.\n--mmdc selects the Mermaid CLI executable (default `mmdc`).\n--durable-writes syncs exported files to disk before returning.",
        svg = ExportFormat::Svg.default_file_name()
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    input: Option<PathBuf>,
    kind: Option<DiagramType>,
    theme: Option<PathBuf>,
    svg_out: Option<PathBuf>,
    source_out: Option<PathBuf>,
    mmdc: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
    durable_writes: bool,
}

fn set_once<T>(slot: &mut Option<T>, value: Option<T>) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value.ok_or(())?);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--type" => {
                let kind: DiagramType = args.next().ok_or(())?.parse().map_err(|_| ())?;
                set_once(&mut options.kind, Some(kind))?;
            }
            "--theme" => set_once(&mut options.theme, args.next().map(PathBuf::from))?,
            "--svg" => set_once(&mut options.svg_out, args.next().map(PathBuf::from))?,
            "--source-out" => set_once(&mut options.source_out, args.next().map(PathBuf::from))?,
            "--mmdc" => set_once(&mut options.mmdc, args.next())?,
            "--log-level" => set_once(&mut options.log_level, args.next())?,
            "--log-format" => set_once(&mut options.log_format, args.next())?,
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.input, Some(PathBuf::from(arg)))?,
        }
    }

    if options.input.is_none() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mermaid-sync".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging(options.log_level.as_deref(), options.log_format.as_deref())?;

        let Some(input) = options.input else {
            print_usage(&program);
            std::process::exit(2);
        };
        let source = std::fs::read_to_string(&input)?;
        let kind = match options.kind.or_else(|| DiagramType::infer_from_source(&source)) {
            Some(kind) => kind,
            None => {
                warn!(path = %input.display(), "unrecognized diagram header, assuming flowchart");
                DiagramType::Flowchart
            }
        };

        let mut session = Session::new(kind, source);
        if let Some(path) = &options.theme {
            session.set_theme(ThemeConfig::load(path)?);
        }

        let renderer = match options.mmdc {
            Some(program) => CommandRenderer::new(program),
            None => CommandRenderer::default(),
        };
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let outcome = runtime.block_on(session.render_with(&renderer));

        match outcome {
            Some(RenderOutcome::Applied) => {}
            Some(RenderOutcome::Failed(err)) => {
                warn!(error = %err, "render failed");
                return Err(err.user_message().into());
            }
            Some(RenderOutcome::Stale) | None => {
                return Err(format!("{}: nothing to render", input.display()).into());
            }
        }

        let svg_out = options
            .svg_out
            .unwrap_or_else(|| PathBuf::from(ExportFormat::Svg.default_file_name()));
        session.export_svg(&svg_out, durability)?;
        if let Some(path) = &options.source_out {
            session.export_source(path, durability)?;
        }

        let bound = session.view().map_or(0, |view| view.bindings.len());
        info!(kind = %kind, elements = bound, out = %svg_out.display(), "done");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("mermaid-sync: {err}");
        std::process::exit(1);
    }
}
