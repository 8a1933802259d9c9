use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Directives used when `RUST_LOG` is unset: the app and its request traces at
/// `info` (or `debug` when verbose), everything else at `warn`.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,xrate={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` replaces the default directives
/// entirely; `XRATE_LOG_FORMAT=json` switches to structured output. Both may
/// come from `.env`.
pub fn init_logging(verbose: bool) {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let json = std::env::var("XRATE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}
