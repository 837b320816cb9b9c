use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `bin_crate` is the crate name of the calling binary, i.e. `env!("CARGO_CRATE_NAME")`, so
/// that its own events are enabled alongside the library's and the HTTP request traces.
pub fn init_logger(level: LevelFilter, bin_crate: &str) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for our crates only.
            EnvFilter::new(format!(
                "{}={level},{bin_crate}={level},tower_http={level}",
                env!("CARGO_CRATE_NAME"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
