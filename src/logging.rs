//! Optional `tracing` subscriber setup for embedders and tests.
//!
//! The library only emits events; nothing here runs unless a caller asks.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info";

/// Install a compact stderr subscriber. `level` is an `EnvFilter`
/// directive such as `"debug"` or `"simplescript=trace"`; without one,
/// `RUST_LOG` is used, then `info`. Later calls do nothing, as does a call
/// made after another global subscriber was installed.
pub fn init_with_level(level: Option<&str>) {
    INIT.call_once(|| {
        if tracing::dispatcher::has_been_set() {
            return;
        }

        let directive = match level {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter_for(&directive))
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
    });
}

fn filter_for(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("WARN: invalid log filter '{directive}': {e}; falling back to '{DEFAULT_FILTER}'");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_falls_back() {
        let filter = filter_for("simplescript=loud");
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing::level_filters::LevelFilter::INFO)
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init_with_level(Some("warn"));
        init_with_level(Some("trace"));
        tracing::debug!("after init");
    }
}
