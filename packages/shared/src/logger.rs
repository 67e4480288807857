//! Logging setup utilities for the Tsunagi signaling relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the server library crate, the shared crate
/// and the binary itself. The log level can be overridden using the `RUST_LOG`
/// environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tsunagi-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tsunagi_shared::logger::setup_logger;
///
/// setup_logger("tsunagi-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "tsunagi_server={level},{shared}={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        shared = env!("CARGO_PKG_NAME").replace('-', "_"),
        bin = binary_name.replace('-', "_"),
    )
}
