//! Telemetry and structured logging setup.
//!
//! Provides consistent logging across all components with:
//! - Structured output for log aggregation
//! - Configurable verbosity via RUST_LOG

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initializes the telemetry/logging system.
///
/// Uses RUST_LOG environment variable for configuration.
/// Defaults to INFO level if not set.
///
/// Example RUST_LOG values:
/// - `info` - All info and above
/// - `zbet_client=debug` - Debug for our crate, default for others
/// - `zbet_client=trace,hyper=warn` - Trace for us, warn for hyper
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            // Default: INFO for everything, DEBUG for our crate
            EnvFilter::new("info,zbet_client=debug")
        });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
        );

    subscriber.init();
}

/// Initializes telemetry with JSON output (for production).
pub fn init_telemetry_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zbet_client=debug"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
        );

    subscriber.init();
}
