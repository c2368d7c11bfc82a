//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Map CLI verbosity to a default filter
//!
//! # Design Decisions
//! - `RUST_LOG` takes precedence over `-v`
//! - Output goes to stderr so stdout stays scriptable

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "proxy_launcher=info",
        1 => "proxy_launcher=debug",
        _ => "proxy_launcher=trace",
    }
}

/// Install the global subscriber.
pub fn init_logging(verbosity: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(verbosity).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
