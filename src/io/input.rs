use crate::defaults::CONFIG_FILE_NAME;
use crate::io::Configuration;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Read the configuration from `excoupling.toml` in the working directory. If the file does
/// not exist, the default settings are used and written to this file, so that the user can
/// see all the used options.
pub fn read_input() -> Result<Configuration> {
    read_input_from(Path::new(CONFIG_FILE_NAME))
}

pub(crate) fn read_input_from(config_file_path: &Path) -> Result<Configuration> {
    if config_file_path.exists() {
        let config_string: String = fs::read_to_string(config_file_path).with_context(|| {
            format!("Unable to read config file {}", config_file_path.display())
        })?;
        toml::from_str(&config_string)
            .with_context(|| format!("Invalid config file {}", config_file_path.display()))
    } else {
        let config: Configuration = Configuration::default();
        let config_string: String = toml::to_string(&config)?;
        fs::write(config_file_path, config_string).with_context(|| {
            format!("Unable to write config file {}", config_file_path.display())
        })?;
        info!(
            "default settings were written to {}",
            config_file_path.display()
        );
        Ok(config)
    }
}
