//! Tracing initialization for binaries and tests embedding the engine.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize a compact subscriber honoring `RUST_LOG`.
///
/// Library code only emits events; subscriber setup belongs to the host
/// application, which may call this instead of wiring its own. Under the
/// test harness (detected via `NEXTEST`/`CARGO_TARGET_TMPDIR`) output goes
/// through the capture-aware test writer at `DEBUG`; otherwise to stderr at
/// `INFO`. Safe to call multiple times, and a no-op when a subscriber is
/// already installed.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .compact();

        if is_test {
            let _ = builder.with_test_writer().try_init();
        } else {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    });
}
