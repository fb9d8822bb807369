//! Telemetry and Observability
//!
//! Sets up the `tracing-subscriber` stack for the explorer. The log level
//! comes from `RUST_LOG` when set, otherwise from the `[core]` config
//! section. Debug builds log pretty-printed to the terminal; release builds
//! emit JSON with span context so a collector can ingest the stream.
//!
//! sqlx logs every statement at info, which drowns the pipeline's own events
//! during seeding, so the default filter caps it at warn.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing at the given level.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Safe to call more
/// than once; only the first initialization takes effect.
pub fn init_telemetry_with_level(log_level: &str) {
    let default_filter = format!("{log_level},argonaut_engine={log_level},sqlx=warn");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false))
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .ok();
    }
}

/// Initialize tracing at "info" before the config is available.
///
/// `main` calls this first so that config loading itself is logged, then
/// re-initializes with the configured level once it is known.
pub fn init_telemetry() {
    init_telemetry_with_level("info");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_initialization_is_harmless() {
        init_telemetry();
        init_telemetry_with_level("debug");
        init_telemetry_with_level("trace");
    }
}
