use std::sync::Once;

static INIT: Once = Once::new();

/// Install a panic backtrace printer and, when the crate was built with the
/// `DEBUG` environment variable set, a log subscriber that prints every
/// cache save, miss and mismatch with its source location.
pub fn setup_test_log() {
    INIT.call_once(|| {
        color_backtrace::install();
        use tracing_subscriber::{prelude::*, registry::Registry};
        if option_env!("DEBUG").is_some() {
            tracing::subscriber::set_global_default(
                Registry::default().with(
                    tracing_subscriber::fmt::Layer::default()
                        .with_test_writer()
                        .with_line_number(true)
                        .with_file(true),
                ),
            )
            .unwrap();
        }
    });
}
