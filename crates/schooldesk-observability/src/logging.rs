use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// # Configuration
///
/// - **Filter**: `RUST_LOG` when set, otherwise `LOG_LEVEL` (default: "info") for
///   the schooldesk crates with noisy dependencies held at warn
/// - **Format**: `LOG_FORMAT=json` switches to JSON lines, otherwise compact output
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "schooldesk={level},schooldesk_cache={level},reqwest=warn,hyper=warn,hyper_util=warn",
            level = log_level
        ))
    });

    let console_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed()
    };

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
