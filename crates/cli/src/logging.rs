use std::io;

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber for filter diagnostics.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` and the
/// default is `warn`. A subscriber installed earlier in the process is kept.
pub(crate) fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}
