mod banner;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use lathe_engine::config::{Configuration, DEFAULT_SETTINGS_FILE};
use lathe_engine::logging::{LoggingConfig, init_logging};
use lathe_engine::shell::ApplicationShell;
use lathe_engine::window::WinitHost;

fn main() -> Result<()> {
    banner::print_header();

    // Settings path: first argument, else `settings.toml` in the working dir.
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    let config = match Configuration::load(&path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LoggingConfig::default());
            log::error!("startup aborted: {e}");
            return Err(e).context("failed to load configuration");
        }
    };

    init_logging(LoggingConfig::from_settings(&config));
    banner::log_settings(&config, &path);

    let host = WinitHost::new()?;
    let mut shell = ApplicationShell::new(config, host);
    shell.configure(scene::install)?;
    shell.run()
}
