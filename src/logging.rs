use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; enabling debug logging
/// (config flag) raises it to `debug` and lets `RUST_LOG` override the
/// filter. When debug logging is off the level is forced regardless of the
/// environment so an embedding page never gets accidental verbose output.
/// Safe to call more than once.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
