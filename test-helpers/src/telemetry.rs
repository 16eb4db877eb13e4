use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build a subscriber filtered by `RUST_LOG`, or `env_filter` when unset.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
}
