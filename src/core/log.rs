use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// The bot runs unattended, so it logs at `info` unless asked for more.
/// `RUST_LOG`, when set, replaces the built-in filters entirely.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = default_targets(verbose, env_filter.is_some());
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(level_name(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(app_filter)
        .with(env_filter)
        .init();
}

fn level_name(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Our own crate at the requested level, dependencies at `warn`. Skipped
/// when `RUST_LOG` is in charge.
fn default_targets(verbose: bool, env_override: bool) -> Option<Targets> {
    if env_override {
        return None;
    }
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    Some(
        Targets::new()
            .with_target("ratebot", level)
            .with_default(LevelFilter::WARN),
    )
}
