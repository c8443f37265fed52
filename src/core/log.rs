use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Filter directives: a non-empty `RUST_LOG` wins, otherwise `verbose`
/// turns on debug output for this crate only.
fn log_directive(verbose: bool, rust_log: Option<String>) -> String {
    match rust_log.filter(|d| !d.trim().is_empty()) {
        Some(directive) => directive,
        None if verbose => "xcalc=debug".to_string(),
        None => "off".to_string(),
    }
}

pub fn init_logging(verbose: bool) {
    let directive = log_directive(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(filter)
        .init();
}
