// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Keeps only the latest value between two display frames.
///
/// `push` reports whether the caller has to request a frame; values pushed while a frame is
/// already requested replace the pending one.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    scheduled: bool,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            scheduled: false,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) -> bool {
        self.pending = Some(value);
        let needs_frame = !self.scheduled;
        self.scheduled = true;
        needs_frame
    }

    /// Called from the frame callback.
    pub fn take(&mut self) -> Option<T> {
        self.scheduled = false;
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.scheduled = false;
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}
