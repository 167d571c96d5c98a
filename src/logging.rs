use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// filter from RUST_LOG-style directives, the default level if absent or invalid
fn filter_from(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Logs to stderr; a valid RUST_LOG overrides the default level.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
