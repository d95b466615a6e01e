//! Logging setup powered by `tracing-subscriber`.
//!
//! Query events are emitted under the `queries` target, session events under
//! `session`; both can be tuned independently through `RUST_LOG`.

use crate::config::{LogFormat, LoggingSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Third-party crates capped below the base level.
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("reqwest", "warn"),
    ("rustls", "warn"),
    ("h2", "warn"),
];

/// Build the filter from the configured level plus noisy-crate caps.
/// A non-empty `RUST_LOG` replaces both.
pub fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(from_env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !from_env.trim().is_empty() {
            return EnvFilter::try_new(&from_env)
                .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG '{}': {}", from_env, e));
        }
    }

    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
///
/// Calling this twice is harmless; the second call is a no-op.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let filter = build_env_filter(&settings.level)?;

    let layer = match settings.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    // try_init fails only when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init();

    Ok(())
}
