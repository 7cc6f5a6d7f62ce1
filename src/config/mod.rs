//! Configuration schema definitions and validation.
//!
//! Defines the configuration structure for the bridge: general settings,
//! the serial receiver and the media player side. All configurations are
//! serializable to/from TOML format.

mod general;
mod loading;
mod media;
mod paths;
mod serial;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use loading::TTY_PATH_ENV;
pub use media::MediaConfig;
pub use paths::ConfigPaths;
pub use serial::SerialConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults except the serial
/// device, which must come from the file, `TTY_PATH` or the command line.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Serial receiver settings.
    #[serde(default)]
    pub serial: SerialConfig,

    /// Media player settings.
    #[serde(default)]
    pub media: MediaConfig,
}
