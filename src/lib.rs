// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! mermaid-sync: visual editing of Mermaid diagram sources.
//!
//! The source text is the only persistent state. Visual edits (drag, rename, restyle, delete)
//! are written back into the text as scoped rewrites and `%% position:` annotations; the
//! rendered SVG is re-derived from the text after every change.

pub mod format;
pub mod generate;
pub mod interact;
pub mod logging;
pub mod model;
pub mod ops;
pub mod render;
pub mod session;
pub mod store;
pub mod tools;
