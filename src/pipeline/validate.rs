// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load and validate the configuration file at `path`.
///
/// Unlike the other commands this does not fall back to defaults: a missing
/// or unparseable file is an error.
pub fn run_validate(path: &Path) -> Result<Config> {
    log::info!("Validating configuration at {}", path.display());

    let config = Config::load(path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match config {
        Ok(config) => {
            log::info!("✓ Config OK");
            let years = config.years()?;
            log::info!("  Years: {:?} (active {})", years.all(), years.active());
            log::info!("  Organizations feed: {}", config.feed.organizations_url);
            log::info!("  Tasks feed: {}", config.feed.tasks_url);
            log::info!("  Organization matching: {:?}", config.sync.org_match);
            log::info!("  Bind address: {}", config.server.bind);
            Ok(config)
        }
        Err(e) => {
            log::error!("Config validation failed: {e}");
            Err(e)
        }
    }
}
