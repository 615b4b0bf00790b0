use std::sync::Once;

/// Logger setup, applied once by [`init_logging`].
#[derive(Debug)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. "tessel_engine=debug,wgpu=warn".
    /// Falls back to `RUST_LOG`, then to info.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Startup failures and shader logs belong on stdout.
    pub target: env_logger::Target,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            target: env_logger::Target::Stdout,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls do nothing.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let LoggingConfig {
            env_filter,
            write_style,
            target,
        } = config;

        let mut builder = env_logger::Builder::new();
        match env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
                for noisy in ["wgpu_core", "wgpu_hal", "naga"] {
                    builder.filter_module(noisy, log::LevelFilter::Warn);
                }
            }
        }
        builder.write_style(write_style).target(target);

        // Someone else (a test harness, an embedding host) may own the logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
