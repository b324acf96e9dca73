use config::load_config;
use config::shared::UpdaterConfig;
use tracing::debug;

use crate::error::{UpdaterError, UpdaterResult};

/// Loads and validates the updater configuration.
///
/// A `.env` file in the working directory is applied to the process environment
/// first, when present. The result is then built with [`load_config`] and checked
/// with [`UpdaterConfig::validate`].
pub fn load_updater_config() -> UpdaterResult<UpdaterConfig> {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(UpdaterError::config(err)),
    }

    let config = load_config::<UpdaterConfig>().map_err(UpdaterError::config)?;
    config.validate().map_err(UpdaterError::config)?;

    Ok(config)
}
