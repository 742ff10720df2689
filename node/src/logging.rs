//! Tracing setup for the governance node.
//!
//! Output is either human-readable lines for development or
//! newline-delimited JSON for log pipelines, selected by [`LogFormat`].
//! `RUST_LOG` overrides the configured filter when set; otherwise the
//! caller-supplied `level` string applies (e.g. `"info"` or
//! `"debug,plenum_node=trace"`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output encoding for the node's log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty-printed lines for a developer's terminal.
    Human,
    /// One JSON object per line, for ingestion by log collectors.
    Json,
}

impl LogFormat {
    /// Parse a config string; anything other than `"json"` selects
    /// [`LogFormat::Human`].
    pub fn from_config(s: &str) -> Self {
        match s {
            "json" => LogFormat::Json,
            _ => LogFormat::Human,
        }
    }
}

/// Install the process-wide tracing subscriber.
///
/// # Panics
///
/// Panics when a subscriber is already installed, so call this once at
/// startup and nowhere else.
pub fn init_logging(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Human => registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init(),
    }
}
