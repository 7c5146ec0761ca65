// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo history over source documents.

use tracing::debug;

use super::document::SourceDocument;

/// Ordered list of documents plus a cursor.
///
/// The log is never empty and `cursor < entries.len()` always holds. Undo/redo only move the
/// cursor; `commit` truncates the redo tail before appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<SourceDocument>,
    cursor: usize,
}

impl HistoryLog {
    pub fn new(initial: SourceDocument) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &SourceDocument {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn entries(&self) -> &[SourceDocument] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Makes `doc` the active document.
    ///
    /// Returns `false` (and records nothing) when `doc` equals the active document.
    pub fn commit(&mut self, doc: SourceDocument) -> bool {
        if &doc == self.current() {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(doc);
        self.cursor = self.entries.len() - 1;
        debug!(cursor = self.cursor, len = self.entries.len(), "history commit");
        true
    }

    pub fn undo(&mut self) -> Option<&SourceDocument> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&SourceDocument> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

/// Owns the active document: the history log plus an optional uncommitted draft.
///
/// Direct keystrokes go into the draft and are not individually undoable; `apply_draft` turns the
/// draft into one history step. Structured edits go through `commit`, which also absorbs any
/// pending draft since those edits were computed from `current()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    history: HistoryLog,
    draft: Option<SourceDocument>,
}

impl SourceBuffer {
    pub fn new(initial: impl Into<SourceDocument>) -> Self {
        Self {
            history: HistoryLog::new(initial.into()),
            draft: None,
        }
    }

    pub fn current(&self) -> &SourceDocument {
        self.draft.as_ref().unwrap_or_else(|| self.history.current())
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// Replaces the active text without recording a history step.
    pub fn edit_text(&mut self, text: impl Into<SourceDocument>) {
        let text = text.into();
        if &text == self.history.current() {
            self.draft = None;
        } else {
            self.draft = Some(text);
        }
    }

    /// Records the pending draft (if any) as one history step.
    pub fn apply_draft(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) => self.history.commit(draft),
            None => false,
        }
    }

    pub fn commit(&mut self, doc: impl Into<SourceDocument>) -> bool {
        self.draft = None;
        self.history.commit(doc.into())
    }

    /// Steps back one entry; discards any pending draft.
    pub fn undo(&mut self) -> bool {
        self.draft = None;
        self.history.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.draft = None;
        self.history.redo().is_some()
    }
}
