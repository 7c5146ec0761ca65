// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of diagram being edited.
///
/// Selected by the caller (template picker, CLI flag); it is not re-derived from the source on
/// every edit. Several kinds share a Mermaid engine (`UseCase`/`Deployment` are flowcharts,
/// `Package` is a class diagram) but keep their own tool catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    Sequence,
    Class,
    State,
    Er,
    Flowchart,
    Gantt,
    Mindmap,
    Pie,
    UseCase,
    Package,
    Deployment,
}

/// Which text-rewrite rule set applies to a diagram type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    /// Flowchart-like sources: bracketed labels, `style` and `linkStyle` directives.
    Graph,
    /// Sequence diagrams: participant aliases, `classDef` + `class` styling.
    Sequence,
    /// Everything else: deletion only.
    Plain,
}

impl DiagramType {
    pub const ALL: [DiagramType; 11] = [
        Self::Flowchart,
        Self::Sequence,
        Self::Class,
        Self::State,
        Self::UseCase,
        Self::Package,
        Self::Deployment,
        Self::Er,
        Self::Gantt,
        Self::Mindmap,
        Self::Pie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Class => "class",
            Self::State => "state",
            Self::Er => "er",
            Self::Flowchart => "flowchart",
            Self::Gantt => "gantt",
            Self::Mindmap => "mindmap",
            Self::Pie => "pie",
            Self::UseCase => "use-case",
            Self::Package => "package",
            Self::Deployment => "deployment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sequence => "Sequence (interactions)",
            Self::Class => "Class (structure)",
            Self::State => "State (lifecycle)",
            Self::Er => "Entity-Relationship (data)",
            Self::Flowchart => "Flowchart (process)",
            Self::Gantt => "Gantt (planning)",
            Self::Mindmap => "Mindmap (ideas)",
            Self::Pie => "Pie",
            Self::UseCase => "Use case (requirements)",
            Self::Package => "Package (architecture)",
            Self::Deployment => "Deployment (infrastructure)",
        }
    }

    pub fn rule_family(self) -> RuleFamily {
        match self {
            Self::Flowchart | Self::State | Self::UseCase | Self::Deployment => RuleFamily::Graph,
            Self::Sequence => RuleFamily::Sequence,
            Self::Class | Self::Er | Self::Gantt | Self::Mindmap | Self::Pie | Self::Package => {
                RuleFamily::Plain
            }
        }
    }

    /// Best-effort guess from the diagram header line.
    ///
    /// Only a convenience for callers without an explicit type (the CLI); the editor itself
    /// carries the type chosen by the user.
    pub fn infer_from_source(source: &str) -> Option<Self> {
        let header = source
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("%%"))?;
        let keyword = header.split_whitespace().next()?;

        let kind = match keyword {
            "sequenceDiagram" => Self::Sequence,
            "classDiagram" | "classDiagram-v2" => {
                if source.lines().any(|line| line.trim_start().starts_with("namespace ")) {
                    Self::Package
                } else {
                    Self::Class
                }
            }
            "stateDiagram" | "stateDiagram-v2" => Self::State,
            "erDiagram" => Self::Er,
            "gantt" => Self::Gantt,
            "mindmap" => Self::Mindmap,
            "pie" => Self::Pie,
            "graph" | "flowchart" => Self::Flowchart,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagram type: {0}")]
pub struct ParseDiagramTypeError(String);

impl FromStr for DiagramType {
    type Err = ParseDiagramTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseDiagramTypeError(s.to_owned()))
    }
}
