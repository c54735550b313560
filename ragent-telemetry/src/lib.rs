//! # ragent-telemetry
//!
//! Logging setup for the RAGent binaries and log capture for tests.
//!
//! Library crates only emit `tracing` events; the binary calls
//! [`init_telemetry`] once at startup to print them to stderr, filtered by
//! `RUST_LOG`.

pub mod capture;

pub use capture::{CapturedEvent, CapturedEvents, EventCaptureLayer, capture_subscriber};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `default_directive` (e.g. `"info"`) applies when `RUST_LOG` is unset or
/// invalid.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
}
