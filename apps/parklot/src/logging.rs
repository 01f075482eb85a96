//! Tracing subscriber setup shared by both binaries.
//!
//! `RUST_LOG` wins when set; otherwise `default_directive` applies. Output
//! goes to stderr so the CLI menu on stdout stays readable.

use tracing_subscriber::EnvFilter;

pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
