use std::sync::Once;

use crate::config::Configuration;

/// Logger setup derived from the startup settings.
///
/// `env_filter` uses `env_logger` syntax (e.g. "info,lathe::draw=debug").
/// Without one, `RUST_LOG` applies, then the built-in default.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: Option<String>) -> Self {
        Self {
            env_filter: filter,
            ..Self::default()
        }
    }

    /// Takes `log_filter` from the settings file.
    pub fn from_settings(config: &Configuration) -> Self {
        Self::with_filter(config.log_filter.clone())
    }

    fn resolved_filter(&self) -> Option<String> {
        self.env_filter
            .clone()
            .filter(|f| !f.trim().is_empty())
            .or_else(|| std::env::var("RUST_LOG").ok())
    }
}

static INIT: Once = Once::new();

/// Installs the process logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.resolved_filter() {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu is chatty at info.
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn);
            }
        }

        // Targets carry the frame/clock/advisory split.
        builder.format_target(true).write_style(config.write_style);

        // A test harness may already own the global logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_filter_is_used() {
        let config = Configuration {
            log_filter: Some("lathe::draw=trace".into()),
            ..Configuration::default()
        };
        let logging = LoggingConfig::from_settings(&config);
        assert_eq!(logging.resolved_filter().as_deref(), Some("lathe::draw=trace"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::with_filter(Some("debug".into())));
    }
}
