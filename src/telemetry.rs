//! Tracing setup for applications embedding `chart-viewport`.
//!
//! The crate only emits `tracing` events; installing a subscriber is the
//! host's call. These helpers exist for hosts that just want sane output.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_directive("info")
}

/// Same as [`init_default_tracing`] but with an explicit fallback directive,
/// e.g. `"chart_viewport=trace"` to follow every zoom/drag/tick decision.
#[must_use]
pub fn init_tracing_with_directive(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
