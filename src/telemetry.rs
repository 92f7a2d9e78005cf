//! Telemetry helpers for applications embedding `picker-core`.
//!
//! Tracing setup stays explicit and opt-in. Hosts can either call one of the
//! init functions below or wire their own `tracing` subscriber; picker
//! diagnostics (unparseable values, malformed presets) are emitted as
//! `warn`/`error` events either way.

/// Filter used when `RUST_LOG` is unset: host crates at `warn`, picker
/// commits and edits at `debug`.
pub const DEFAULT_FILTER: &str = "warn,picker_core=debug";

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`,
/// falling back to [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already installed by the host.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_owned());
        init_tracing_with_filter(&filter)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Like [`init_default_tracing`] with explicit `EnvFilter` directives.
///
/// Invalid directives fall back to [`DEFAULT_FILTER`].
#[must_use]
pub fn init_tracing_with_filter(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(directives)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{init_default_tracing, init_tracing_with_filter};

    #[test]
    fn only_first_subscriber_install_succeeds() {
        let first = init_tracing_with_filter("picker_core=trace");
        let second = init_default_tracing();
        assert!(!second);
        assert_eq!(first, cfg!(feature = "telemetry"));
    }
}
