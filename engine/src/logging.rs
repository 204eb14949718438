//! Tracing setup for embedding binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; defaults to debug-level engine logs.
/// Call once from the embedding process before using the engine.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coalwatch_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
