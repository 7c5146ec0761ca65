// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Identifier-scoped text matching.
//!
//! Identifiers and label texts are always escaped before being embedded in a pattern, and token
//! matches are checked against identifier boundaries so `A` never matches inside `AB` or
//! `LINE-ITEM`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Escapes regex metacharacters so `text` only ever matches itself.
pub fn escape(text: &str) -> String {
    regex::escape(text)
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Whether `haystack[start..end]` is a whole identifier token.
///
/// A hyphen joined to identifier characters on both sides (`LINE-ITEM`) continues the token;
/// a hyphen that starts an arrow (`A-->B`) does not. Boundaries are only enforced on sides where
/// the needle itself begins/ends with an identifier character.
pub fn is_token_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let needle = &haystack[start..end];
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().next_back()) else {
        return false;
    };

    if is_ident_char(first) {
        let mut before = haystack[..start].chars().rev();
        match before.next() {
            Some(ch) if is_ident_char(ch) => return false,
            Some('-') if before.next().is_some_and(is_ident_char) => return false,
            _ => {}
        }
    }

    if is_ident_char(last) {
        let mut after = haystack[end..].chars();
        match after.next() {
            Some(ch) if is_ident_char(ch) => return false,
            Some('-') if after.next().is_some_and(is_ident_char) => return false,
            _ => {}
        }
    }

    true
}

/// Whether `line` contains `token` as a whole identifier (literal match, no pattern semantics).
pub fn contains_token(line: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    line.match_indices(token)
        .any(|(start, m)| is_token_boundary(line, start, start + m.len()))
}

/// Whether `line` carries a connection arrow (`-->`, `->>`, `-.->`, `==>`, `--`, `<|--` …).
pub fn has_arrow(line: &str) -> bool {
    static ARROW: OnceLock<Regex> = OnceLock::new();
    ARROW
        .get_or_init(|| Regex::new(r"[-=.]{2,}|->|<-").expect("arrow regex"))
        .is_match(line)
}

/// Rewrites every match of `re` for which `rewrite` returns a replacement; other matches are
/// kept verbatim. Returns the new text and the number of rewritten matches.
pub fn replace_scoped(
    haystack: &str,
    re: &Regex,
    mut rewrite: impl FnMut(&Captures<'_>) -> Option<String>,
) -> (String, usize) {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    let mut count = 0;

    for caps in re.captures_iter(haystack) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if let Some(replacement) = rewrite(&caps) {
            out.push_str(&haystack[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
            count += 1;
        }
    }

    if count == 0 {
        return (haystack.to_owned(), 0);
    }
    out.push_str(&haystack[last..]);
    (out, count)
}

/// Drops every line matching `remove`; remaining lines are joined with `\n`.
pub fn remove_lines(text: &str, mut remove: impl FnMut(&str) -> bool) -> String {
    text.split('\n')
        .filter(|line| !remove(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends `line` after the trimmed end of `text`.
pub fn append_line(text: &str, line: &str) -> String {
    let body = text.trim_end();
    if body.is_empty() {
        return line.to_owned();
    }
    format!("{body}\n{line}")
}
