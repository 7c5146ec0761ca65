// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use regex::Regex;

use super::StylePatch;
use crate::format::pattern::{
    append_line, contains_token, escape, is_token_boundary, remove_lines, replace_scoped,
};
use crate::model::{DiagramType, RuleFamily};

/// Per-family text rewrite rules.
///
/// Returning `None` means the family has no rule for that edit; `Some(text)` may still equal the
/// input when the rule matched nothing.
pub trait DiagramRules: Sync {
    fn family(&self) -> RuleFamily;

    fn rename_label(&self, _source: &str, _id: &str, _text: &str) -> Option<String> {
        None
    }

    fn restyle(&self, _source: &str, _id: &str, _style: &StylePatch) -> Option<String> {
        None
    }

    /// Whether edge colors are expressed as `linkStyle <index>` directives.
    fn styles_edges(&self) -> bool {
        false
    }

    /// Removes every line that references `id` as a whole token.
    fn delete_element(&self, source: &str, id: &str) -> String {
        remove_lines(source, |line| contains_token(line, id))
    }
}

/// Flowchart-like diagrams: `id[label]`, `id(label)`, `id{label}`, `id>label]` and `style` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphRules;

/// `participant`/`actor` aliases and `classDef` + `class` styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRules;

/// Deletion only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRules;

static GRAPH: GraphRules = GraphRules;
static SEQUENCE: SequenceRules = SequenceRules;
static PLAIN: PlainRules = PlainRules;

pub fn rules_for(kind: DiagramType) -> &'static dyn DiagramRules {
    match kind.rule_family() {
        RuleFamily::Graph => &GRAPH,
        RuleFamily::Sequence => &SEQUENCE,
        RuleFamily::Plain => &PLAIN,
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern built from escaped input is valid")
}

impl DiagramRules for GraphRules {
    fn family(&self) -> RuleFamily {
        RuleFamily::Graph
    }

    fn rename_label(&self, source: &str, id: &str, text: &str) -> Option<String> {
        let re = compile(&format!(r"({}\s*[(\[{{>]+)(.*?)([)\]}}]+)", escape(id)));
        let (out, _) = replace_scoped(source, &re, |caps| {
            let open = caps.get(1)?;
            if !is_token_boundary(source, open.start(), open.start() + id.len()) {
                return None;
            }
            Some(format!("{}{text}{}", open.as_str(), &caps[3]))
        });
        Some(out)
    }

    fn restyle(&self, source: &str, id: &str, style: &StylePatch) -> Option<String> {
        let existing = compile(&format!(r"^\s*style\s+{}\s+", escape(id)));
        let text = remove_lines(source, |line| existing.is_match(line));
        let directive = format!("style {id} {}", style.declarations().join(","));
        Some(append_line(&text, &directive))
    }

    fn styles_edges(&self) -> bool {
        true
    }
}

/// Class name used for a styled sequence participant.
pub(crate) fn sequence_class_name(id: &str) -> String {
    let sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("cls_{sanitized}")
}

impl DiagramRules for SequenceRules {
    fn family(&self) -> RuleFamily {
        RuleFamily::Sequence
    }

    fn rename_label(&self, source: &str, id: &str, text: &str) -> Option<String> {
        let re = compile(&format!(
            r#"(?m)^([ \t]*(?:participant|actor)[ \t]+{}[ \t]+as[ \t]+)(?:"([^"\r\n]*)"|([^\r\n]*?))([ \t]*\r?)$"#,
            escape(id)
        ));
        let mut done = false;
        let (out, _) = replace_scoped(source, &re, |caps| {
            if done {
                return None;
            }
            done = true;
            let alias = if caps.get(2).is_some() {
                format!("\"{text}\"")
            } else {
                text.to_owned()
            };
            Some(format!("{}{alias}{}", &caps[1], &caps[4]))
        });
        Some(out)
    }

    fn restyle(&self, source: &str, id: &str, style: &StylePatch) -> Option<String> {
        let class = sequence_class_name(id);
        let class_def = compile(&format!(r"^\s*classDef\s+{}\s+", escape(&class)));
        let class_use = compile(&format!(
            r"^\s*class\s+{}\s+{}\s*$",
            escape(id),
            escape(&class)
        ));
        let text = remove_lines(source, |line| {
            class_def.is_match(line) || class_use.is_match(line)
        });
        let text = append_line(
            &text,
            &format!("classDef {class} {}", style.declarations().join(",")),
        );
        Some(append_line(&text, &format!("class {id} {class}")))
    }
}

impl DiagramRules for PlainRules {
    fn family(&self) -> RuleFamily {
        RuleFamily::Plain
    }
}
