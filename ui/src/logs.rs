//! Browser console logging for the products page.
//!
//! The fetch controller logs each request start, supersede, discard and
//! failure at debug/warn; the filter below keeps those visible next to the
//! page's own events while silencing everything else below error.

use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_web::MakeWebConsoleWriter;

const LOG_FILTER: &str = "error,ui=debug,fetch=debug";

/// Route `tracing` events to the web console. Safe to call on every render
/// of the root component: only the first call installs the subscriber.
pub fn init_logging() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level())
        .with_level(false);

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::new(LOG_FILTER))
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(filter = LOG_FILTER, "console logging ready");
    }
}
