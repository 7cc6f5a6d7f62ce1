use std::fmt::Debug;

use async_trait::async_trait;

use crate::services::mpris::{LoopMode, MediaError, PlayerId};

/// Operations the remote can drive on one media player.
///
/// Every operation is a remote call; implementations hold no cached player
/// state, so each read reflects the live value at call time.
#[async_trait]
pub trait MediaPlayer: Debug + Send + Sync {
    /// Identity of the endpoint, `None` for the empty sentinel.
    fn id(&self) -> Option<&PlayerId>;

    /// Short human-readable label.
    fn display_name(&self) -> &str;

    /// Skip to next track
    async fn next(&self) -> Result<(), MediaError>;

    /// Go to previous track
    async fn previous(&self) -> Result<(), MediaError>;

    /// Pause playback
    async fn pause(&self) -> Result<(), MediaError>;

    /// Start playback
    async fn play(&self) -> Result<(), MediaError>;

    /// Toggle between playing and paused
    async fn play_pause(&self) -> Result<(), MediaError>;

    /// Stop playback
    async fn stop(&self) -> Result<(), MediaError>;

    /// Current volume
    async fn volume(&self) -> Result<f64, MediaError>;

    /// Set volume. Values are passed through unclamped.
    async fn set_volume(&self, volume: f64) -> Result<(), MediaError>;

    /// Whether shuffle is enabled
    async fn shuffle(&self) -> Result<bool, MediaError>;

    /// Enable or disable shuffle
    async fn set_shuffle(&self, shuffle: bool) -> Result<(), MediaError>;

    /// Current loop mode
    ///
    /// # Errors
    /// Returns `MediaError::InvalidLoopMode` if the player reports a status
    /// outside of None, Track and Playlist
    async fn loop_mode(&self) -> Result<LoopMode, MediaError>;

    /// Set loop mode
    async fn set_loop_mode(&self, mode: LoopMode) -> Result<(), MediaError>;
}

/// Stand-in for "no player" when the registry is empty.
///
/// Commands complete immediately and reads return fixed defaults, so
/// callers never have to check for a missing player.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPlayer;

#[async_trait]
impl MediaPlayer for EmptyPlayer {
    fn id(&self) -> Option<&PlayerId> {
        None
    }

    fn display_name(&self) -> &str {
        "no player"
    }

    async fn next(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn previous(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn play(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn play_pause(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn stop(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn volume(&self) -> Result<f64, MediaError> {
        Ok(0.0)
    }

    async fn set_volume(&self, _volume: f64) -> Result<(), MediaError> {
        Ok(())
    }

    async fn shuffle(&self) -> Result<bool, MediaError> {
        Ok(false)
    }

    async fn set_shuffle(&self, _shuffle: bool) -> Result<(), MediaError> {
        Ok(())
    }

    async fn loop_mode(&self) -> Result<LoopMode, MediaError> {
        Ok(LoopMode::None)
    }

    async fn set_loop_mode(&self, _mode: LoopMode) -> Result<(), MediaError> {
        Ok(())
    }
}
