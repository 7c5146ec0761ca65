// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Write-only exports of the current diagram.
//!
//! Two snapshots exist: the raw source text and the last bound SVG markup. Neither is read back.

pub mod export;

pub use export::{
    export_source, export_svg, write_atomic, ExportFormat, StoreError, WriteDurability,
};
