//! Tracing subscriber setup
//!
//! Configures the global tracing subscriber with an `EnvFilter` (overridable
//! through `RUST_LOG`) and a console layer in either human-readable or JSON
//! form.

use clap::ValueEnum;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,rds_snapshots=debug,rds_snapshots_services=debug";

/// Console log encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for log shipping
    Json,
}

/// Initialize tracing
///
/// Should be called once at startup before any tracing macros are used. A
/// second call leaves the existing subscriber in place.
pub fn init(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    // Only fails when a global subscriber is already installed
    if result.is_ok() {
        debug!(format = ?format, "Tracing initialized");
    }
}
