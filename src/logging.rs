//! Logging setup for the command-line tool.
//!
//! The library only emits `tracing` events; the binary installs a subscriber
//! that writes them to stderr so stdout stays reserved for entry names.
//!
//! `RUST_LOG` takes precedence over the verbosity flags:
//! ```bash
//! RUST_LOG=zipspy=trace zipspy photo.jpg
//! ```

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging/tracing system. `default_filter` applies when
/// `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    // Ignore the error if a subscriber is already set.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
