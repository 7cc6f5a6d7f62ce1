use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Baud rate the receiver firmware opens its serial line with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial receiver configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SerialConfig {
    /// Path of the serial device the receiver is attached to.
    pub device: Option<PathBuf>,

    /// Line speed of the serial device.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}
