use tracing_subscriber::EnvFilter;

/// Initialise logging on stderr; stdout carries the IPC stream.
///
/// Without debug the level is fixed at `info`, ignoring `RUST_LOG`. With
/// debug enabled `RUST_LOG` may override the default `debug` filter.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
