use tracing_subscriber::EnvFilter;

/// Configure tracing once for the whole process.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (from config) applies.
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=tailor_orders::clients=debug,info cargo run
/// ```
pub fn setup_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
