use tracing_subscriber::{EnvFilter, fmt};

/// Install the global log subscriber.
///
/// The level comes from `RUST_LOG` and defaults to `warn`, so command
/// output is not interleaved with request traces.
///
/// - RUST_LOG=debug mango stories
/// - RUST_LOG=mango=trace mango project
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logger initialized");
}
