use tracing_subscriber::EnvFilter;

/// Filter directive for `-v` count, falling back to the configured level.
fn directive(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. RUST_LOG beats both `-v` and the config file.
pub fn init(configured: &str, verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(directive(configured, verbose)).unwrap_or_else(|_| EnvFilter::new("error"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
