//! Logging setup
//!
//! One-shot tracing initialization for the hosting process. Library code
//! only emits events; installing a subscriber is the application's call,
//! made once at startup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `default_directive` (e.g.
/// `"folio=info"`) when the variable is unset or malformed. Safe to call
/// only once per process; later calls are ignored with a warning.
pub fn init(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive.into());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::warn!("tracing subscriber already installed; keeping the existing one");
    }
}
