use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_directive`. Calling this twice is harmless.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
