//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Calling this more than once
/// is harmless: later calls leave the first subscriber in place and return
/// `false`.
pub fn init(config: &LogConfig) -> bool {
    install(config, false)
}

/// Like [`init`], but writes through the test harness so output is captured
/// per test.
pub fn init_for_tests(config: &LogConfig) -> bool {
    install(config, true)
}

fn install(config: &LogConfig, test_writer: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);
    if test_writer {
        builder.with_test_writer().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
