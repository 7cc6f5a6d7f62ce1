use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::{Config, ConfigPaths};
use crate::{BridgeError, Result};

/// Environment variable that names the serial device.
pub const TTY_PATH_ENV: &str = "TTY_PATH";

impl Config {
    /// Loads the configuration file.
    ///
    /// With an explicit `path` the file must exist. Without one the default
    /// location is used and a missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_file(path),
            None => {
                let default_path = ConfigPaths::main_config()?;
                if default_path.exists() {
                    Self::load_file(&default_path)
                } else {
                    debug!(path = %default_path.display(), "No config file, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Config> {
        info!(path = %path.display(), "Loading configuration");
        let content = fs::read_to_string(path).map_err(|e| BridgeError::io(e, path))?;
        toml::from_str(&content).map_err(|e| BridgeError::toml_parse(e, Some(path)))
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    /// Returns error if the string is not valid TOML for this schema
    pub fn from_toml_str(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| BridgeError::toml_parse(e, None))
    }

    /// Applies device overrides on top of the file values.
    ///
    /// The environment value wins over the file, the command line flag wins
    /// over both. Empty values are treated as absent.
    pub fn apply_overrides(&mut self, env_device: Option<String>, cli_device: Option<PathBuf>) {
        if let Some(device) = env_device.filter(|d| !d.is_empty()) {
            self.serial.device = Some(PathBuf::from(device));
        }

        if let Some(device) = cli_device.filter(|d| !d.as_os_str().is_empty()) {
            self.serial.device = Some(device);
        }
    }

    /// Checks values that the schema alone cannot express.
    ///
    /// # Errors
    /// Returns `InvalidConfigField` for a volume step that is not a positive
    /// finite number
    pub fn validate(&self) -> Result<()> {
        let step = self.media.volume_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(BridgeError::InvalidConfigField {
                field: "volume_step".to_string(),
                component: "media".to_string(),
                reason: format!("must be a positive number, got {step}"),
            });
        }

        Ok(())
    }

    /// Returns the serial device path.
    ///
    /// # Errors
    /// Returns `MissingDevicePath` when no device was configured
    pub fn device_path(&self) -> Result<&Path> {
        self.serial
            .device
            .as_deref()
            .ok_or(BridgeError::MissingDevicePath)
    }
}
