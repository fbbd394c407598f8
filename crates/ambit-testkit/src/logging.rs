//! Tracing setup for tests

use tracing_subscriber::EnvFilter;

/// Install an `RUST_LOG`-filtered subscriber writing to the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
