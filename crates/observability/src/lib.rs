//! Process-wide logging setup for pricing hosts.

/// Tracing subscriber configuration.
pub mod tracing;

pub use tracing::LogFormat;

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}
