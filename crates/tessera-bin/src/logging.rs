// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.

use tessera_config::{LogFormat, LogLevel};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::error::{BinError, BinResult};

/// Dependency targets held back so request logs stay readable.
const DEPENDENCY_DIRECTIVES: &[&str] = &[
    "hyper=warn",
    "tower=warn",
    "axum=info",
    "tokio=info",
    "sqlx=warn",
];

// =============================================================================
// Logging Initialization
// =============================================================================

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Fails if `level` is not a known
/// level name or a subscriber is already installed.
///
/// # Example
///
/// ```ignore
/// use tessera_bin::logging::init_logging;
/// use tessera_config::LogFormat;
///
/// init_logging("info", LogFormat::Text)?;
/// ```
pub fn init_logging(level: &str, format: LogFormat) -> BinResult<()> {
    let level = LogLevel::parse(level)
        .ok_or_else(|| BinError::config(format!("Invalid log level '{}'", level)))?;

    let result = match format {
        LogFormat::Text => init_text_logging(build_filter(level)),
        LogFormat::Json => init_json_logging(build_filter(level)),
        LogFormat::Compact => init_compact_logging(build_filter(level)),
    };

    result.map_err(|e| BinError::init(format!("Failed to install logger: {}", e)))
}

/// Builds the filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: LogLevel) -> EnvFilter {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    DEPENDENCY_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}

fn init_text_logging(filter: EnvFilter) -> Result<(), TryInitError> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(is_terminal),
        )
        .try_init()
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init()
}

fn init_compact_logging(filter: EnvFilter) -> Result<(), TryInitError> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(is_terminal),
        )
        .try_init()
}
