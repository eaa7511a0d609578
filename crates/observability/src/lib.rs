//! Tracing and logging setup shared by the binaries.

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    logging::init();
}

/// Subscriber configuration (filter, output format).
pub mod logging;
