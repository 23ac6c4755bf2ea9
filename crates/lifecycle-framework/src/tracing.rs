/// Initializes structured logging for binaries and demos.
///
/// Filtering follows `RUST_LOG`:
/// - `RUST_LOG=info` - transitions, creations, bulk summaries
/// - `RUST_LOG=debug` - every request, response status and 405 fallback step
/// - `RUST_LOG=lifecycle_framework=debug,dashboard=info` - per-crate levels
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
