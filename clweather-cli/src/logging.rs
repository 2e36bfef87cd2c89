use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "clweather=warn,clweather_core=warn";

/// Initialize the stderr logger.
///
/// `--log-level` wins over `RUST_LOG`, which wins over the default filter.
pub fn init(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
