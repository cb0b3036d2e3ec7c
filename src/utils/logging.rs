//! Logging bootstrap for host shells embedding the analytics core.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize env_logger (reads `RUST_LOG`, defaults to info).
///
/// Safe to call more than once; only the first call takes effect.
pub fn init() {
    INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    });
}
