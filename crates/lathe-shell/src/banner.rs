//! Startup banner.
//!
//! The header is printed before the settings file is read, so it goes to
//! stdout; the settings summary is logged once the logger exists.

use std::path::Path;

use lathe_engine::config::Configuration;

pub fn header() -> Vec<String> {
    vec![
        String::new(),
        "  ================ ENGINE STARTUP ================".to_string(),
        format!("  lathe v{}", env!("CARGO_PKG_VERSION")),
        "  ================================================".to_string(),
        String::new(),
    ]
}

pub fn settings_summary(config: &Configuration, path: &Path) -> Vec<String> {
    vec![
        format!("title    : {}", config.title),
        format!("settings : {}", path.display()),
        format!(
            "surface  : {}x{} samples={} vsync={}",
            config.width, config.height, config.sample_count, config.vsync
        ),
        format!("update   : {} Hz", config.update_rate),
    ]
}

pub fn print_header() {
    for line in header() {
        println!("{line}");
    }
}

pub fn log_settings(config: &Configuration, path: &Path) {
    for line in settings_summary(config, path) {
        log::info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_the_startup() {
        assert!(header().iter().any(|l| l.contains("ENGINE STARTUP")));
    }

    #[test]
    fn summary_reports_the_loaded_settings() {
        let config = Configuration {
            width: 800,
            height: 600,
            ..Configuration::default()
        };
        let lines = settings_summary(&config, Path::new("custom.toml"));
        assert!(lines.iter().any(|l| l.contains("800x600")));
        assert!(lines.iter().any(|l| l.contains("custom.toml")));
    }
}
