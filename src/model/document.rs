// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// The full diagram source text.
///
/// Documents are immutable values: every edit produces a new `SourceDocument`. Cloning is cheap
/// (shared buffer), which lets history entries and in-flight render requests hold snapshots
/// without copying the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceDocument {
    text: Arc<str>,
}

impl SourceDocument {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

impl Default for SourceDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl Deref for SourceDocument {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for SourceDocument {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for SourceDocument {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SourceDocument {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
