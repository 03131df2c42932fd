//! Diagnostic tracing.
//!
//! The console presenter's verbose channel is emitted as `tracing` debug
//! events; this module installs the subscriber that decides whether they are
//! shown. Output goes to stderr so it never mixes with rewritten source on
//! stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` when set. Otherwise shows warnings, plus this crate's
/// debug events when `verbose` is on.
///
/// # Example
/// ```bash
/// RUST_LOG=importsort=debug importsort -l ./...
/// ```
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "warn,importsort=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}
