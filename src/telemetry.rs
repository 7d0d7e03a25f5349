//! Tracing subscriber setup for binaries and test harnesses.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `info`. Safe to call
/// more than once; later calls are no-ops, so test binaries can invoke it
/// from every fixture.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_tracing();
        init_tracing();
    }
}
