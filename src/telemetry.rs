use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` if set, else `default_directives`, else `info`
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global JSON subscriber on stdout.
/// Fails if a subscriber is already installed.
pub fn init_telemetry(default_directives: &str) -> Result<(), TryInitError> {
    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter(default_directives))
        .with(formatting_layer)
        .try_init()
}
