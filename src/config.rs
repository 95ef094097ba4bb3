pub mod range_types;

use crate::game_logic::errors::{GrowthError, GrowthResult};
use crate::resources::WaveConfig;
use bevy::log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> GrowthResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(GrowthError::ConfigDirNotFound)?;
    path.push("wavegrowth");
    fs::create_dir_all(&path)?;
    path.push("config.toml");
    Ok(path)
}

/// Load and check a config file, reporting every failure
pub fn load_from_path(path: &Path) -> GrowthResult<WaveConfig> {
    if !path.exists() {
        return Err(GrowthError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    let config: WaveConfig = toml::from_str(&contents)?;
    config.check()?;
    info!("Loaded wave config from {}", path.display());
    Ok(config)
}

/// Config from the platform config dir, or the defaults if it is missing or broken
pub fn load_config() -> WaveConfig {
    match get_config_path().and_then(|path| load_from_path(&path)) {
        Ok(config) => config,
        Err(GrowthError::ConfigFileNotFound { .. }) => WaveConfig::default(),
        Err(err) => {
            warn!("Falling back to default wave config: {err}");
            WaveConfig::default()
        }
    }
}

pub fn save_to_path(config: &WaveConfig, path: &Path) -> GrowthResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

pub fn save_config(config: &WaveConfig) -> GrowthResult<()> {
    save_to_path(config, &get_config_path()?)
}
