//! Logger setup for the console binary

use env_logger::Env;

/// Install `env_logger`, defaulting to `info` unless `RUST_LOG` says otherwise.
/// Calling it twice is harmless.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
