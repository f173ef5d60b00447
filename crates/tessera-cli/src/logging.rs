//! Logger setup for the CLI.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the global logger once.
///
/// `filter` follows the `env_logger` filter syntax (e.g. `"debug"`,
/// `"tessera_io=debug,warn"`). Without one, `RUST_LOG` is used, and
/// without that, `info`. Subsequent calls are ignored.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
