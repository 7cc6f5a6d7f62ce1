use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Volume change applied by one press of a volume button.
pub const DEFAULT_VOLUME_STEP: f64 = 0.05;

/// Media service configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MediaConfig {
    /// List of player bus name patterns to ignore during discovery
    pub ignored_players: Vec<String>,

    /// Volume change per press of a volume button.
    pub volume_step: f64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ignored_players: Vec::new(),
            volume_step: DEFAULT_VOLUME_STEP,
        }
    }
}
