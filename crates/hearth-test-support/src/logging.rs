//! One-time tracing setup for test binaries.

use hearth_telemetry::{LoggingConfig, init_logging};
use once_cell::sync::OnceCell;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the workspace subscriber the first time any test in the binary
/// asks for it; later calls are no-ops.
pub fn init_test_logging() {
    INSTALLED.get_or_init(|| {
        if let Err(err) = init_logging(&LoggingConfig::default()) {
            eprintln!("test logging not installed: {err}");
        }
    });
}
