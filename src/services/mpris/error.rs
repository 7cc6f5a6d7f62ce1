use super::PlayerId;

/// Errors that can occur during media operations
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Failed to control the player
    #[error("Failed to control player: {0}")]
    ControlFailed(String),

    /// A loop status outside of None, Track and Playlist
    #[error("Invalid loop mode {0:?}: expected None, Track or Playlist")]
    InvalidLoopMode(String),

    /// Player does not expose the interface an operation needs
    #[error("Player {player} doesn't expose {interface}")]
    UnsupportedInterface {
        /// Player that lacks the interface
        player: PlayerId,
        /// Name of the missing interface
        interface: String,
    },

    /// Introspection data could not be parsed
    #[error("Invalid introspection data: {0}")]
    Introspection(String),

    /// Failed to initialize the media service
    #[error("Failed to initialize media service: {0}")]
    InitializationFailed(String),
}
