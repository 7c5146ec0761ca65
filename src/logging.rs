// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of mermaid-sync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! `tracing-subscriber` setup for the binary.
//!
//! Level: argument, then `MERMAID_SYNC_LOG_LEVEL`, then `RUST_LOG`, then `info`.
//! Format (`compact` | `pretty` | `json`): argument, then `MERMAID_SYNC_LOG_FORMAT`, then
//! `compact`. Output goes to stderr so stdout stays free for piping.

use std::str::FromStr;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LEVEL_ENV: &str = "MERMAID_SYNC_LOG_LEVEL";
pub const FORMAT_ENV: &str = "MERMAID_SYNC_LOG_FORMAT";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub const VARIANTS: [&'static str; 3] = ["compact", "pretty", "json"];
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format `{0}` (expected compact, pretty or json)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(UnknownLogFormat(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    Format(#[from] UnknownLogFormat),
    #[error("global subscriber already installed")]
    Init(#[from] TryInitError),
}

fn resolve_filter(level: Option<&str>) -> EnvFilter {
    let explicit = level
        .map(str::to_owned)
        .or_else(|| std::env::var(LEVEL_ENV).ok());
    match explicit {
        Some(level) => EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn resolve_format(format: Option<&str>) -> Result<LogFormat, UnknownLogFormat> {
    match format
        .map(str::to_owned)
        .or_else(|| std::env::var(FORMAT_ENV).ok())
    {
        Some(raw) => raw.parse(),
        None => Ok(LogFormat::default()),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(level: Option<&str>, format: Option<&str>) -> Result<(), LoggingError> {
    let filter = resolve_filter(level);
    let format = resolve_format(format)?;
    let registry = Registry::default().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .try_init()?,
    }
    Ok(())
}
