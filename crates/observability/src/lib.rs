//! Process-wide tracing setup.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize tracing with the format named by `LOG_FORMAT` (default JSON).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| LogFormat::parse(&raw))
        .unwrap_or_default();
    subscriber::init_with(format);
}
