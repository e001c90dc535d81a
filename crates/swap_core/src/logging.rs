use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes console logging with an env-filter.
///
/// `RUST_LOG` takes precedence over `default_filter`. Uses `try_init` so
/// repeated calls (e.g. from tests) fail softly instead of panicking.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        let _ = init_logging("info");
        // Second init fails softly when the global subscriber is already
        // installed (possibly by another test in this process).
        let result = init_logging("debug");
        drop(result);
    }

    #[test]
    fn env_filter_fallback_parses() {
        let filters = ["info", "debug", "swap_deploy=debug,warn"];
        for f in &filters {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(f));
            drop(filter);
        }
    }
}
