use std::sync::Once;

/// Logger configuration.
///
/// `filter` follows the `env_logger` directive syntax (e.g. "debug" or
/// "glaze_engine=trace"). `write_style` controls ANSI coloring.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the process-wide logger once; later calls are ignored.
///
/// Frame-skip diagnostics are logged at debug level, so the default filter
/// stays at info to keep per-frame retries out of production logs. Embedding
/// hosts that install their own `log` backend can skip this entirely — a
/// previously installed logger wins.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        // The host runtime may already own the global logger.
        let _ = builder.try_init();

        log::debug!("logging initialized");
    });
}
