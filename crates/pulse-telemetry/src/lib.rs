mod metrics;

pub use metrics::{MetricsRecorder, MetricsSnapshot};

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for a pipeline run.
///
/// `RUST_LOG` overrides the default level. Safe to call once per process;
/// a second call is a no-op rather than a panic so tests can share it.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init("info");
        init("debug");
    }
}
